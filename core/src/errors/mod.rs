//! Error types for strategy construction and authentication outcomes

use std::time::Duration;
use thiserror::Error;

/// Fault raised by application-supplied code (patterns, verify callbacks)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the mobile phone strategy.
///
/// Configuration variants are returned from constructors.
/// `MissingCredentials`, `InvalidPhoneFormat` and `VerificationRejected`
/// travel with `fail` outcomes as their reason; the rest go through the
/// host's `error` channel.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("MobilePhoneStrategy requires a verify callback")]
    MissingVerifyCallback,

    #[error("passReqToCallback is {pass_req_to_callback} but the verify callback does not match that shape")]
    CallbackShapeMismatch { pass_req_to_callback: bool },

    #[error("Invalid phone number pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid strategy configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Validator Error phoneNumber")]
    InvalidPhoneFormat,

    #[error("Verification rejected")]
    VerificationRejected,

    #[error("Phone number pattern failed: {0}")]
    PatternFault(#[source] BoxError),

    #[error("Verify callback failed: {0}")]
    CallbackFault(#[source] BoxError),

    #[error("Verification error: {0}")]
    VerificationFault(#[source] BoxError),

    #[error("Verify callback did not resolve within {0:?}")]
    VerifyTimeout(Duration),

    #[error("Verify callback dropped its completion handler without resolving it")]
    Abandoned,
}

impl StrategyError {
    /// Errors that stop a strategy from being constructed
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            StrategyError::MissingVerifyCallback
                | StrategyError::CallbackShapeMismatch { .. }
                | StrategyError::InvalidPattern(_)
                | StrategyError::InvalidConfig(_)
        )
    }
}

pub type StrategyResult<T> = Result<T, StrategyError>;
