//! Application configuration with security considerations.
//!
//! All values are read from environment variables once at start-up. Sensitive
//! fields are marked and must never be logged; the webhook secret is handed to
//! the verifier at construction instead of being read from a global.

use anyhow::Context;
use envconfig::Envconfig;

use crate::consts;

/// Environment variables used to configure the webhook service.
///
/// # Security Requirements
/// - `SENSITIVE` fields must come from a secret store in production
/// - Never log or expose sensitive values
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub wep_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub wep_server_port: u16,

    /// 🔒 SENSITIVE: Wompi events secret, shared HMAC key for webhook signatures
    /// Rotation: change in the Wompi dashboard and here at the same time
    pub wompi_events_secret: String,

    /// Freshness window for webhook timestamps, in seconds (NON-SENSITIVE)
    #[envconfig(default = "300")]
    pub webhook_tolerance_secs: u64,

    /// Max webhook body size accepted by the raw body capture (NON-SENSITIVE)
    #[envconfig(default = "262144")]
    pub webhook_max_body_bytes: usize,

    /// 🔒 SENSITIVE: Logfire write token, telemetry is only exported when set
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment
    pub fn load() -> anyhow::Result<Self> {
        Self::init_from_env()
            .context("failed to load app config, check the environment variables")
    }

    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Address the web server binds to
    pub fn server_addr(&self) -> (String, u16) {
        (self.wep_server_host.to_string(), self.wep_server_port)
    }

    pub fn max_body_bytes(&self) -> usize {
        if self.webhook_max_body_bytes == 0 {
            return consts::DEFAULT_MAX_BODY_BYTES;
        }
        self.webhook_max_body_bytes
    }
}
