//! Types exchanged between the strategy and its host

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::StrategyError;

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Missing credentials";
pub const INVALID_PHONE_NUMBER_MESSAGE: &str = "Validator Error phoneNumber";

/// Structured reason attached to a `fail` outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Challenge {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Read a challenge out of the info a verify callback passed along
    /// with a rejection, e.g. `{"message": "Code expired"}`.
    pub fn from_info(info: Option<&Value>) -> Self {
        let message = match info {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        };
        Self { message }
    }
}

/// Per-call overrides for the rejection messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_request_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_phone_number_message: Option<String>,
}

impl AuthenticateOptions {
    pub fn with_bad_request_message(mut self, message: impl Into<String>) -> Self {
        self.bad_request_message = Some(message.into());
        self
    }

    pub fn with_bad_phone_number_message(mut self, message: impl Into<String>) -> Self {
        self.bad_phone_number_message = Some(message.into());
        self
    }

    pub(crate) fn missing_credentials_message(&self) -> &str {
        self.bad_request_message
            .as_deref()
            .unwrap_or(MISSING_CREDENTIALS_MESSAGE)
    }

    pub(crate) fn invalid_phone_number_message(&self) -> &str {
        self.bad_phone_number_message
            .as_deref()
            .unwrap_or(INVALID_PHONE_NUMBER_MESSAGE)
    }
}

/// Which channel an outcome was signalled on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Fail,
    Error,
}

/// A terminal authentication outcome, as captured by an outcome host
#[derive(Debug)]
pub enum Outcome<U> {
    Success { user: U, info: Option<Value> },
    Fail {
        challenge: Challenge,
        status: Option<u16>,
        /// `MissingCredentials`, `InvalidPhoneFormat` or `VerificationRejected`
        reason: StrategyError,
    },
    Error(StrategyError),
}

impl<U> Outcome<U> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success { .. } => OutcomeKind::Success,
            Outcome::Fail { .. } => OutcomeKind::Fail,
            Outcome::Error(_) => OutcomeKind::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind() == OutcomeKind::Success
    }

    /// Status carried by a `fail` outcome
    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Fail { status, .. } => *status,
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&U> {
        match self {
            Outcome::Success { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        match self {
            Outcome::Fail { challenge, .. } => Some(challenge),
            _ => None,
        }
    }

    /// Why a `fail` outcome was signalled, independent of its message
    pub fn fail_reason(&self) -> Option<&StrategyError> {
        match self {
            Outcome::Fail { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
