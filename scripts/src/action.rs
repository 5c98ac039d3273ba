use andino_webhooks::webhook::wompi::{
    errors::{VerificationOutcome, WebhookError},
    raw_body::RawBody,
    security::{SignatureHeaders, SignatureVerifier},
};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use crate::{config, utils};

#[derive(Args, Debug, Clone)]
pub struct SignArgs {
    /// Payload file sent as webhook body, `-` for stdin
    #[arg(short, long)]
    body: String,
    /// Unix seconds to sign with, defaults to now
    #[arg(short, long)]
    timestamp: Option<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Payload file exactly as received
    #[arg(short, long)]
    body: String,
    /// Value of the x-signature header
    #[arg(short, long)]
    signature: String,
    /// Value of the x-timestamp header
    #[arg(short, long)]
    timestamp: String,
    /// Unix seconds to verify at, defaults to now
    #[arg(long)]
    now: Option<i64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    /// Prints the signature headers for a payload
    Sign(SignArgs),
    /// Checks a captured delivery offline
    Verify(VerifyArgs),
}

/// Tools to smoke test the wompi webhook endpoint
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let app_config = config::AppConfig::load()?;
        let verifier = SignatureVerifier::with_tolerance(
            app_config.wompi_events_secret.as_bytes(),
            app_config.webhook_tolerance_secs,
        );

        match &self.action {
            Action::Sign(SignArgs { body, timestamp }) => {
                if app_config.is_prod() {
                    warn!("signing with the production events secret");
                }

                let body = utils::read_body(body)?;
                let timestamp = timestamp
                    .unwrap_or_else(|| chrono::Utc::now().timestamp())
                    .to_string();

                for line in sign_headers(&verifier, &timestamp, &body)? {
                    println!("{line}");
                }
                Ok(())
            }
            Action::Verify(VerifyArgs {
                body,
                signature,
                timestamp,
                now,
            }) => {
                let body = utils::read_body(body)?;
                let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());

                match verify_delivery(&verifier, signature, timestamp, &body, now) {
                    Ok(()) => {
                        println!("{}", VerificationOutcome::Accepted);
                        info!("delivery accepted");
                        Ok(())
                    }
                    Err(e) => {
                        println!("{}: {e}", e.outcome());
                        warn!("delivery rejected: {e}");
                        anyhow::bail!("delivery rejected: {}", e.outcome());
                    }
                }
            }
        }
    }
}

/// Header lines a client must send along with `body`
pub fn sign_headers(
    verifier: &SignatureVerifier,
    timestamp: &str,
    body: &str,
) -> anyhow::Result<[String; 2]> {
    let signature = verifier.signature_header(timestamp, body)?;

    Ok([
        format!("x-timestamp: {timestamp}"),
        format!("x-signature: {signature}"),
    ])
}

/// Runs the server's checks on a captured delivery, the error carries the reason
pub fn verify_delivery(
    verifier: &SignatureVerifier,
    signature: &str,
    timestamp: &str,
    body: &str,
    now: i64,
) -> Result<(), WebhookError> {
    verifier.verify_at(
        SignatureHeaders::new(Some(signature), Some(timestamp)),
        &RawBody::capture(body.as_bytes()),
        now,
    )
}
