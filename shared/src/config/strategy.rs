//! Mobile phone strategy configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_PHONE_NUMBER_FIELD: &str = "phoneNumber";
pub const DEFAULT_VERIFY_CODE_FIELD: &str = "verifyCode";

/// Serializable settings for the mobile phone strategy.
///
/// Field names mirror the JSON option keys integrators already use
/// (`phoneNumberField`, `verifyCodeField`, `phoneNumberRegExp`,
/// `passReqToCallback`), so a config file can be shared with older
/// deployments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    /// Request field holding the phone number
    #[serde(default = "default_phone_number_field")]
    #[validate(length(min = 1))]
    pub phone_number_field: String,

    /// Request field holding the verification code
    #[serde(default = "default_verify_code_field")]
    #[validate(length(min = 1))]
    pub verify_code_field: String,

    /// Pattern the phone number must match; unchecked when absent
    #[serde(default, rename = "phoneNumberRegExp")]
    pub phone_number_regexp: Option<String>,

    /// Hand the request to the verify callback as its first argument
    #[serde(default)]
    pub pass_req_to_callback: bool,

    /// Upper bound on how long the verify callback may take to resolve
    #[serde(default)]
    pub verify_timeout_secs: Option<u64>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            phone_number_field: default_phone_number_field(),
            verify_code_field: default_verify_code_field(),
            phone_number_regexp: None,
            pass_req_to_callback: false,
            verify_timeout_secs: None,
        }
    }
}

impl StrategyConfig {
    /// Create from `MPS_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            phone_number_field: non_empty_var("MPS_PHONE_NUMBER_FIELD")
                .unwrap_or(defaults.phone_number_field),
            verify_code_field: non_empty_var("MPS_VERIFY_CODE_FIELD")
                .unwrap_or(defaults.verify_code_field),
            phone_number_regexp: non_empty_var("MPS_PHONE_NUMBER_REGEXP"),
            pass_req_to_callback: non_empty_var("MPS_PASS_REQ_TO_CALLBACK")
                .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.pass_req_to_callback),
            verify_timeout_secs: non_empty_var("MPS_VERIFY_TIMEOUT_SECS")
                .and_then(|value| value.parse().ok()),
        }
    }

    pub fn with_phone_number_regexp(mut self, pattern: impl Into<String>) -> Self {
        self.phone_number_regexp = Some(pattern.into());
        self
    }

    pub fn with_verify_timeout_secs(mut self, secs: u64) -> Self {
        self.verify_timeout_secs = Some(secs);
        self
    }

    pub fn verify_timeout(&self) -> Option<Duration> {
        self.verify_timeout_secs.map(Duration::from_secs)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_phone_number_field() -> String {
    String::from(DEFAULT_PHONE_NUMBER_FIELD)
}

fn default_verify_code_field() -> String {
    String::from(DEFAULT_VERIFY_CODE_FIELD)
}
