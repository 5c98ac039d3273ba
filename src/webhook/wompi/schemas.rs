//! Wompi event payloads
//!
//! Only the fields the payment confirmation needs are modeled, the rest of the
//! event is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::models::payment::Transaction;

pub const TRANSACTION_UPDATED: &str = "transaction.updated";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WompiEvent {
    /// Event name, e.g. `transaction.updated`
    pub event: String,
    pub data: EventData,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EventData {
    pub transaction: Transaction,
}

impl WompiEvent {
    /// Decodes the event out of the already parsed request body
    pub fn from_value(value: &serde_json::Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    pub fn is_transaction_update(&self) -> bool {
        self.event == TRANSACTION_UPDATED
    }
}
