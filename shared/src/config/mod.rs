//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `server` - Bind address for HTTP hosts
//! - `strategy` - Field names, phone pattern and timeout for the strategy

pub mod environment;
pub mod server;
pub mod strategy;

use serde::{Deserialize, Serialize};

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use strategy::{StrategyConfig, DEFAULT_PHONE_NUMBER_FIELD, DEFAULT_VERIFY_CODE_FIELD};

/// Complete application configuration for a host embedding the strategy
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub strategy: StrategyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            strategy: StrategyConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }
}
