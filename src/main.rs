//! # AndinoExpress Webhook Server
//!
//! Entry point of the payment webhook service. Loads the configuration,
//! configures logging and serves the webhook routes.

use andino_webhooks::{api, config, logger, webhook};
use anyhow::Context;
use ntex::web;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::load()?;

    let shutdown_handler = logger::setup_logfire(&app_config)?;

    let server_result = run_server(app_config).await;

    shutdown_handler.shutdown()?;

    server_result
}

/// Creates application state, the secret is handed to the verifier here
fn create_app_state(app_config: &config::AppConfig) -> webhook::AppState {
    webhook::AppState {
        verifier: webhook::wompi::security::SignatureVerifier::with_tolerance(
            app_config.wompi_events_secret.as_bytes(),
            app_config.webhook_tolerance_secs,
        ),
        payment_confirmation: Box::new(api::payment::LoggedPaymentConfirmation),
    }
}

async fn run_server(app_config: config::AppConfig) -> anyhow::Result<()> {
    let server_addr = app_config.server_addr();

    logfire::info!(
        "Starting webhook server on {host}:{port}",
        host = server_addr.0.clone(),
        port = i64::from(server_addr.1)
    );

    web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .state(web::types::PayloadConfig::new(app_config.max_body_bytes()))
            .state(create_app_state(&app_config))
            .configure(webhook::routes::wompi)
    })
    .bind(server_addr)
    .context("failed to bind webhook server")?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
