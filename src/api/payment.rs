//! Payment confirmation for authenticated Wompi events.
//!
//! Order fulfilment lives in the store backend; this module only defines the
//! seam the webhook route calls once a delivery has been verified.

use async_trait::async_trait;

use crate::webhook::wompi::schemas::WompiEvent;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentConfirmation {
    /// Applies a verified event, an error makes the provider retry the delivery
    async fn confirm(&self, event: &WompiEvent) -> anyhow::Result<()>;
}

pub type ImplPaymentConfirmation = Box<dyn PaymentConfirmation + Send + Sync>;

/// Records verified transactions in the service log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedPaymentConfirmation;

#[async_trait]
impl PaymentConfirmation for LoggedPaymentConfirmation {
    async fn confirm(&self, event: &WompiEvent) -> anyhow::Result<()> {
        if !event.is_transaction_update() {
            logfire::info!("Ignoring wompi event {name}", name = event.event.clone());
            return Ok(());
        }

        let transaction = &event.data.transaction;
        if !transaction.is_approved() {
            logfire::warn!(
                "Transaction {id} for order {reference} not approved: {status}",
                id = transaction.id.clone(),
                reference = transaction.reference.clone(),
                status = transaction.status.to_string()
            );
            return Ok(());
        }

        logfire::info!(
            "Transaction {id} for order {reference}: {status} ({amount_in_cents} cents {currency})",
            id = transaction.id.clone(),
            reference = transaction.reference.clone(),
            status = transaction.status.to_string(),
            amount_in_cents = transaction.amount_in_cents as i64,
            currency = transaction.currency.clone()
        );

        Ok(())
    }
}

/// Runs the confirmation for an already parsed body.
///
/// Returns `Ok(false)` when the body is not a Wompi event; such deliveries are
/// authentic but carry nothing to confirm.
pub async fn confirm_parsed_body(
    confirmation: &ImplPaymentConfirmation,
    body: &serde_json::Value,
) -> anyhow::Result<bool> {
    let event = match WompiEvent::from_value(body) {
        Ok(event) => event,
        Err(e) => {
            logfire::warn!(
                "Verified webhook body is not a wompi event: {error}",
                error = e.to_string()
            );
            return Ok(false);
        }
    };

    confirmation.confirm(&event).await?;
    Ok(true)
}
