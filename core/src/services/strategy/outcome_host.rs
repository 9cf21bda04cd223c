//! Host that turns the outcome signals into an awaitable value

use serde_json::Value;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::errors::StrategyError;

use super::traits::AuthenticationHost;
use super::types::{Challenge, Outcome};

/// Captures the first outcome signalled into a oneshot channel.
///
/// When every handle to the host is dropped without a signal, the receiver
/// observes a closed channel.
pub struct OutcomeHost<U> {
    sender: Mutex<Option<oneshot::Sender<Outcome<U>>>>,
}

impl<U: Send> OutcomeHost<U> {
    pub fn channel() -> (Self, oneshot::Receiver<Outcome<U>>) {
        let (sender, receiver) = oneshot::channel();
        let host = Self {
            sender: Mutex::new(Some(sender)),
        };
        (host, receiver)
    }

    fn deliver(&self, outcome: Outcome<U>) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match sender {
            Some(sender) => {
                if sender.send(outcome).is_err() {
                    tracing::debug!(
                        event = "outcome_receiver_gone",
                        "Outcome arrived after the caller stopped waiting"
                    );
                }
            }
            None => {
                tracing::warn!(
                    event = "duplicate_outcome_ignored",
                    "Outcome host already received an outcome"
                );
            }
        }
    }
}

impl<U: Send> AuthenticationHost<U> for OutcomeHost<U> {
    fn success(&self, user: U, info: Option<Value>) {
        self.deliver(Outcome::Success { user, info });
    }

    fn fail(&self, challenge: Challenge, status: Option<u16>, reason: StrategyError) {
        self.deliver(Outcome::Fail {
            challenge,
            status,
            reason,
        });
    }

    fn error(&self, error: StrategyError) {
        self.deliver(Outcome::Error(error));
    }
}
