//! Webhook handlers for external integrations
//!
//! ## Modules
//!
//! - [`wompi`] - Wompi payment events, signature verified before processing

pub mod routes;
pub mod wompi;

use crate::api::payment::ImplPaymentConfirmation;

/// State shared by the webhook handlers
pub struct AppState {
    pub verifier: wompi::security::SignatureVerifier,
    pub payment_confirmation: ImplPaymentConfirmation,
}
