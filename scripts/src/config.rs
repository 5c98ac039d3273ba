use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    #[envconfig(default = "local")]
    pub env: String,
    pub wompi_events_secret: String,
    #[envconfig(default = "300")]
    pub webhook_tolerance_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::init_from_env()?)
    }

    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let vars = HashMap::from([
            ("WOMPI_EVENTS_SECRET".to_string(), "s".to_string()),
            ("WEBHOOK_TOLERANCE_SECS".to_string(), "-10".to_string()),
        ]);

        assert!(AppConfig::init_from_hashmap(&vars).is_err());
    }

    #[test]
    fn test_default_tolerance() {
        let vars = HashMap::from([("WOMPI_EVENTS_SECRET".to_string(), "s".to_string())]);
        let config = AppConfig::init_from_hashmap(&vars).unwrap();

        assert_eq!(config.webhook_tolerance_secs, 300);
        assert!(!config.is_prod());
    }
}
