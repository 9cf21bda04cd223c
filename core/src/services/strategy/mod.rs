//! Mobile phone authentication strategy
//!
//! This module provides the strategy and the contracts around it:
//! - Credential extraction from request body and query
//! - Optional phone number shape check
//! - Delegation to an application-supplied verify callback
//! - Mapping of the callback's result onto success, fail or error

mod done;
mod options;
mod outcome_host;
mod service;
mod traits;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use done::Done;
pub use options::StrategyOptions;
pub use outcome_host::OutcomeHost;
pub use service::{MobilePhoneStrategy, MobilePhoneStrategyBuilder, STRATEGY_NAME};
pub use traits::{
    AuthenticationHost, CredentialSource, FnPattern, PhoneCodeVerifier, PhoneNumberPattern,
    Strategy,
};
pub use types::{
    AuthenticateOptions, Challenge, Outcome, OutcomeKind, INVALID_PHONE_NUMBER_MESSAGE,
    MISSING_CREDENTIALS_MESSAGE,
};
pub use verifier::Verifier;
