//! Single-use completion handler handed to verify callbacks

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{BoxError, StrategyError};

use super::traits::AuthenticationHost;
use super::types::Challenge;

/// Forwards the first outcome of one `authenticate` call to the host and
/// drops any later ones.
pub(crate) struct Signal<U> {
    host: Arc<dyn AuthenticationHost<U>>,
    masked_phone: String,
    settled: AtomicBool,
    /// Set while the verify callback is being invoked
    dispatching: AtomicBool,
    dropped_unresolved: AtomicBool,
}

impl<U> Signal<U> {
    pub(crate) fn new(host: Arc<dyn AuthenticationHost<U>>, masked_phone: String) -> Self {
        Self {
            host,
            masked_phone,
            settled: AtomicBool::new(false),
            dispatching: AtomicBool::new(false),
            dropped_unresolved: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    pub(crate) fn begin_dispatch(&self) {
        self.dispatching.store(true, Ordering::Release);
    }

    /// Close the dispatch window. A handler dropped unresolved inside it is
    /// only reported when the dispatch itself signalled nothing.
    pub(crate) fn finish_dispatch(&self) {
        self.dispatching.store(false, Ordering::Release);
        if self.dropped_unresolved.load(Ordering::Acquire) && !self.is_settled() {
            self.warn_dropped();
        }
    }

    #[cfg(test)]
    pub(crate) fn handler_dropped_during_dispatch(&self) -> bool {
        self.dropped_unresolved.load(Ordering::Acquire)
    }

    fn handler_dropped(&self) {
        if self.dispatching.load(Ordering::Acquire) {
            self.dropped_unresolved.store(true, Ordering::Release);
        } else {
            self.warn_dropped();
        }
    }

    fn warn_dropped(&self) {
        tracing::warn!(
            phone = %self.masked_phone,
            event = "completion_handler_dropped",
            "Verify callback dropped its completion handler without resolving it"
        );
    }

    fn settle(&self, channel: &'static str) -> bool {
        if self.settled.swap(true, Ordering::AcqRel) {
            tracing::warn!(
                phone = %self.masked_phone,
                channel = channel,
                event = "duplicate_outcome_ignored",
                "Authentication outcome already signalled; ignoring"
            );
            return false;
        }
        true
    }

    pub(crate) fn success(&self, user: U, info: Option<Value>) {
        if self.settle("success") {
            tracing::info!(
                phone = %self.masked_phone,
                event = "authentication_succeeded",
                "Mobile phone authentication succeeded"
            );
            self.host.success(user, info);
        }
    }

    pub(crate) fn fail(&self, challenge: Challenge, status: Option<u16>, reason: StrategyError) {
        if self.settle("fail") {
            tracing::info!(
                phone = %self.masked_phone,
                status = status,
                reason = %reason,
                message = challenge.message.as_deref().unwrap_or_default(),
                event = "authentication_failed",
                "Mobile phone authentication failed"
            );
            self.host.fail(challenge, status, reason);
        }
    }

    pub(crate) fn error(&self, error: StrategyError) {
        if self.settle("error") {
            tracing::error!(
                phone = %self.masked_phone,
                error = %error,
                event = "authentication_error",
                "Mobile phone authentication errored"
            );
            self.host.error(error);
        }
    }
}

/// Completion handler for a verify callback.
///
/// Every resolving method consumes the handler, so a callback can report
/// at most once. A handler dropped without being resolved leaves the
/// request without an outcome; that is logged, and outcome hosts report
/// it as [`StrategyError::Abandoned`].
pub struct Done<U> {
    signal: Option<Arc<Signal<U>>>,
}

impl<U> Done<U> {
    pub(crate) fn new(signal: Arc<Signal<U>>) -> Self {
        Self {
            signal: Some(signal),
        }
    }

    fn take(mut self) -> Option<Arc<Signal<U>>> {
        self.signal.take()
    }

    /// Credentials verified for `user`
    pub fn success(self, user: U) {
        if let Some(signal) = self.take() {
            signal.success(user, None);
        }
    }

    /// Credentials verified; `info` is passed through to the host
    pub fn success_with_info(self, user: U, info: Value) {
        if let Some(signal) = self.take() {
            signal.success(user, Some(info));
        }
    }

    /// Credentials rejected, no further detail
    pub fn fail(self) {
        self.fail_with(Challenge::default());
    }

    /// Credentials rejected with a reason for the host
    pub fn fail_with(self, challenge: Challenge) {
        if let Some(signal) = self.take() {
            signal.fail(challenge, None, StrategyError::VerificationRejected);
        }
    }

    /// Verification could not be carried out
    pub fn error(self, error: impl Into<BoxError>) {
        if let Some(signal) = self.take() {
            signal.error(StrategyError::VerificationFault(error.into()));
        }
    }

    /// Resolve from an `(error, user, info)` style result: `Err` goes to
    /// the error channel, `Ok(None)` fails with a challenge read from
    /// `info`, and `Ok(Some(user))` succeeds with `info` attached.
    pub fn complete(self, result: Result<Option<U>, BoxError>, info: Option<Value>) {
        match result {
            Err(error) => self.error(error),
            Ok(None) => self.fail_with(Challenge::from_info(info.as_ref())),
            Ok(Some(user)) => match info {
                Some(info) => self.success_with_info(user, info),
                None => self.success(user),
            },
        }
    }
}

impl<U> Drop for Done<U> {
    fn drop(&mut self) {
        if let Some(signal) = &self.signal {
            if !signal.is_settled() {
                signal.handler_dropped();
            }
        }
    }
}
