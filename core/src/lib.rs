//! # Mobile Phone Strategy Core
//!
//! Authentication strategy that checks a phone number and a one-time
//! verification code by delegating to an application-supplied callback.
//! This crate contains the strategy, the host capability traits, the
//! credential lookup helpers and the error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
