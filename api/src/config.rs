use std::env;

use mps_core::{AuthenticateOptions, StrategyOptions, StrategyResult};
use mps_shared::config::{AppConfig, Environment, ServerConfig};
use serde::{Deserialize, Serialize};

/// Configuration of the demo host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub app: AppConfig,

    /// Overrides for the fail messages, from `MPS_BAD_REQUEST_MESSAGE`
    /// and `MPS_BAD_PHONE_NUMBER_MESSAGE`
    #[serde(default)]
    pub authenticate: AuthenticateOptions,
}

impl Config {
    pub fn from_env() -> Self {
        let mut authenticate = AuthenticateOptions::default();
        if let Ok(message) = env::var("MPS_BAD_REQUEST_MESSAGE") {
            authenticate = authenticate.with_bad_request_message(message);
        }
        if let Ok(message) = env::var("MPS_BAD_PHONE_NUMBER_MESSAGE") {
            authenticate = authenticate.with_bad_phone_number_message(message);
        }

        Config {
            app: AppConfig::from_env(),
            authenticate,
        }
    }

    /// Validated strategy options built from the strategy section
    pub fn strategy_options(&self) -> StrategyResult<StrategyOptions> {
        StrategyOptions::try_from(&self.app.strategy)
    }

    pub fn environment(&self) -> Environment {
        self.app.environment
    }

    pub fn server(&self) -> &ServerConfig {
        &self.app.server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_options_reject_bad_regexp() {
        let mut config = Config::default();
        config.app.strategy.phone_number_regexp = Some(String::from("^(1[3-9]"));
        assert!(config.strategy_options().is_err());
    }

    #[test]
    fn test_deserialize_flattened() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "environment": "production",
            "strategy": { "phoneNumberField": "mobile" },
            "authenticate": { "badRequestMessage": "Fill in both fields" }
        }))
        .unwrap();

        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.app.strategy.phone_number_field, "mobile");
        assert_eq!(config.server().port, 8080);
    }
}
