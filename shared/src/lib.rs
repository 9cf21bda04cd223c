//! Shared configuration and utilities for the mobile phone strategy
//!
//! This crate provides common functionality used across the workspace:
//! - Strategy, environment and logging configuration
//! - Error response body for HTTP hosts
//! - Phone number utilities (normalization, masking, preset patterns)

pub mod config;
pub mod errors;
pub mod utils;

pub use config::{AppConfig, Environment, LogFormat, LoggingConfig, ServerConfig, StrategyConfig};
pub use errors::{error_codes, ErrorResponse};
pub use utils::phone;
