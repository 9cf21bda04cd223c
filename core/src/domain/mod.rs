//! Request-side domain types

pub mod credentials;

pub use credentials::{lookup, CredentialRequest};
