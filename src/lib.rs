//! # AndinoExpress payment webhooks
//!
//! Receives Wompi payment events for the Comercializadora SPG store, checks
//! that every delivery is authentic and fresh, and hands the verified events
//! to the payment confirmation.

pub mod api;
pub mod config;
pub mod consts;
pub mod logger;
pub mod models;
pub mod webhook;
