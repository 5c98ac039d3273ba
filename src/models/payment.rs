use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Final or intermediate state of a Wompi transaction
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    // Waiting on the payer or the payment network
    #[default]
    #[display("PENDING")]
    Pending,
    // Payment accepted, the order can be fulfilled
    #[display("APPROVED")]
    Approved,
    // Rejected by the payment network or by anti-fraud
    #[display("DECLINED")]
    Declined,
    // Approved first and reverted afterwards
    #[display("VOIDED")]
    Voided,
    // Failed on the provider side
    #[display("ERROR")]
    Error,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// Order reference sent when the checkout was created
    pub reference: String,
    pub amount_in_cents: u64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub payment_method_type: Option<String>,
}

impl Transaction {
    pub fn is_approved(&self) -> bool {
        self.status.eq(&TransactionStatus::Approved)
    }
}
