//! Wompi payment webhook integration
//!
//! ## Submodules
//!
//! - [`raw_body`] - Captures the exact request body before any JSON parsing
//! - [`security`] - `x-signature` / `x-timestamp` verification
//! - [`routes`] - HTTP endpoint receiving the events
//! - [`schemas`] - Event payloads
//! - [`errors`] - Rejection reasons and their HTTP statuses

pub mod errors;
pub mod raw_body;
pub mod routes;
pub mod schemas;
pub mod security;

pub use routes::receive;
