//! Traits at the seams between the strategy, its host and the application

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::{BoxError, StrategyError};

use super::types::{AuthenticateOptions, Challenge};

/// Outcome sink implemented by the hosting authentication framework.
///
/// A strategy signals exactly one of these per `authenticate` call.
pub trait AuthenticationHost<U>: Send + Sync {
    /// Credentials verified
    fn success(&self, user: U, info: Option<Value>);
    /// Credentials absent, malformed or rejected; `reason` tells which
    fn fail(&self, challenge: Challenge, status: Option<u16>, reason: StrategyError);
    /// Unexpected fault
    fn error(&self, error: StrategyError);
}

/// Capability every pluggable authentication strategy provides to its host
pub trait Strategy<R, U>: Send + Sync {
    fn name(&self) -> &str;

    /// Start authenticating `req`. Returns once the work has been
    /// dispatched; the outcome arrives through `host`.
    fn authenticate(
        &self,
        req: &R,
        options: &AuthenticateOptions,
        host: Arc<dyn AuthenticationHost<U>>,
    );
}

/// Request surfaces credentials are read from
pub trait CredentialSource {
    fn body(&self) -> Option<&Value>;
    fn query(&self) -> Option<&Value>;
}

/// Shape check for the submitted phone number
pub trait PhoneNumberPattern: Send + Sync {
    /// `Ok(false)` means no match; `Err` means the check itself broke
    fn test(&self, phone_number: &str) -> Result<bool, BoxError>;
}

impl PhoneNumberPattern for Regex {
    fn test(&self, phone_number: &str) -> Result<bool, BoxError> {
        Ok(self.is_match(phone_number))
    }
}

/// Adapts a closure into a [`PhoneNumberPattern`]
pub struct FnPattern<F>(pub F);

impl<F> PhoneNumberPattern for FnPattern<F>
where
    F: Fn(&str) -> Result<bool, BoxError> + Send + Sync,
{
    fn test(&self, phone_number: &str) -> Result<bool, BoxError> {
        (self.0)(phone_number)
    }
}

/// Application-side check of a phone number and code pair.
///
/// `Ok(None)` means the pair was rejected; `Err` is a fault such as an
/// unreachable database.
#[async_trait]
pub trait PhoneCodeVerifier<U>: Send + Sync {
    async fn verify(&self, phone_number: &str, verify_code: &str) -> Result<Option<U>, BoxError>;
}
