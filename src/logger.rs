use logfire::{ShutdownHandler, config::SendToLogfire};

use crate::config::AppConfig;

/// Configures logfire for the server process.
///
/// Spans and logs are always printed to the console; they are only exported
/// when a `LOGFIRE_TOKEN` is configured.
pub fn setup_logfire(app_config: &AppConfig) -> anyhow::Result<ShutdownHandler> {
    let mut builder = logfire::configure().install_panic_handler();

    builder = match &app_config.logfire_token {
        Some(token) => builder
            .send_to_logfire(SendToLogfire::Yes)
            .with_token(token),
        None => builder.send_to_logfire(SendToLogfire::No),
    };

    Ok(builder.finish()?)
}
