//! Construction-time options for the mobile phone strategy

use mps_shared::config::{StrategyConfig, DEFAULT_PHONE_NUMBER_FIELD, DEFAULT_VERIFY_CODE_FIELD};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use crate::errors::{StrategyError, StrategyResult};

use super::traits::PhoneNumberPattern;

/// Options captured when the strategy is constructed
#[derive(Clone)]
pub struct StrategyOptions {
    /// Request field holding the phone number
    pub phone_number_field: String,
    /// Request field holding the verification code
    pub verify_code_field: String,
    /// Shape check for the phone number; skipped when `None`
    pub phone_number_pattern: Option<Arc<dyn PhoneNumberPattern>>,
    /// Pass the request to the verify callback as its first argument
    pub pass_req_to_callback: bool,
    /// Bound applied by `authenticate_outcome`; `None` waits forever
    pub verify_timeout: Option<Duration>,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            phone_number_field: DEFAULT_PHONE_NUMBER_FIELD.to_string(),
            verify_code_field: DEFAULT_VERIFY_CODE_FIELD.to_string(),
            phone_number_pattern: None,
            pass_req_to_callback: false,
            verify_timeout: None,
        }
    }
}

impl fmt::Debug for StrategyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyOptions")
            .field("phone_number_field", &self.phone_number_field)
            .field("verify_code_field", &self.verify_code_field)
            .field("phone_number_pattern", &self.phone_number_pattern.is_some())
            .field("pass_req_to_callback", &self.pass_req_to_callback)
            .field("verify_timeout", &self.verify_timeout)
            .finish()
    }
}

impl StrategyOptions {
    /// Empty names keep the default field name
    pub fn with_phone_number_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !field.is_empty() {
            self.phone_number_field = field;
        }
        self
    }

    /// Empty names keep the default field name
    pub fn with_verify_code_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !field.is_empty() {
            self.verify_code_field = field;
        }
        self
    }

    pub fn with_phone_number_pattern(mut self, pattern: impl PhoneNumberPattern + 'static) -> Self {
        self.phone_number_pattern = Some(Arc::new(pattern));
        self
    }

    /// Compile `pattern` as a regular expression
    pub fn with_phone_number_regexp(self, pattern: &str) -> StrategyResult<Self> {
        let regex = Regex::new(pattern)?;
        Ok(self.with_phone_number_pattern(regex))
    }

    pub fn with_pass_req_to_callback(mut self, pass: bool) -> Self {
        self.pass_req_to_callback = pass;
        self
    }

    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = Some(timeout);
        self
    }
}

impl TryFrom<&StrategyConfig> for StrategyOptions {
    type Error = StrategyError;

    fn try_from(config: &StrategyConfig) -> StrategyResult<Self> {
        config.validate()?;

        let mut options = StrategyOptions::default()
            .with_phone_number_field(config.phone_number_field.clone())
            .with_verify_code_field(config.verify_code_field.clone())
            .with_pass_req_to_callback(config.pass_req_to_callback);

        if let Some(pattern) = config.phone_number_regexp.as_deref() {
            options = options.with_phone_number_regexp(pattern)?;
        }
        options.verify_timeout = config.verify_timeout();

        Ok(options)
    }
}
