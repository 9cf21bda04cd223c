//! Authentication route handlers

pub mod mobile_phone;

use std::sync::Arc;

use mps_core::{AuthenticateOptions, MobilePhoneStrategy};

use crate::extract::HttpCredentials;

pub use mobile_phone::mobile_phone_login;

/// Application state shared by the authentication routes
pub struct AppState<U> {
    pub strategy: Arc<MobilePhoneStrategy<HttpCredentials, U>>,
    /// Per-call message overrides applied to every login
    pub options: AuthenticateOptions,
}

impl<U> AppState<U> {
    pub fn new(strategy: MobilePhoneStrategy<HttpCredentials, U>) -> Self {
        Self {
            strategy: Arc::new(strategy),
            options: AuthenticateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AuthenticateOptions) -> Self {
        self.options = options;
        self
    }
}
