//! Mobile phone + verification code strategy

use mps_shared::phone::mask_phone_number;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::credentials::lookup;
use crate::errors::{BoxError, StrategyError, StrategyResult};

use super::done::{Done, Signal};
use super::options::StrategyOptions;
use super::outcome_host::OutcomeHost;
use super::traits::{AuthenticationHost, CredentialSource, PhoneNumberPattern, Strategy};
use super::types::{AuthenticateOptions, Challenge, Outcome};
use super::verifier::Verifier;

/// Name the strategy registers under
pub const STRATEGY_NAME: &str = "mobilePhone";

const BAD_REQUEST: u16 = 400;

/// Authenticates a phone number and one-time code by delegating to an
/// application-supplied verify callback.
///
/// # Examples
///
/// ```
/// use mps_core::{CredentialRequest, MobilePhoneStrategy, Verifier};
///
/// let strategy = MobilePhoneStrategy::<CredentialRequest, u64>::new(Verifier::credentials(
///     |phone_number, verify_code, done| {
///         if phone_number == "13800000000" && verify_code == "1234" {
///             done.success(1);
///         } else {
///             done.fail();
///         }
///         Ok(())
///     },
/// ))
/// .unwrap();
/// assert_eq!(strategy.options().phone_number_field, "phoneNumber");
/// ```
pub struct MobilePhoneStrategy<R, U> {
    name: String,
    options: StrategyOptions,
    verifier: Verifier<R, U>,
}

impl<R, U> MobilePhoneStrategy<R, U>
where
    R: CredentialSource + 'static,
    U: Send + 'static,
{
    /// Create a strategy with default options
    pub fn new(verifier: Verifier<R, U>) -> StrategyResult<Self> {
        Self::with_options(StrategyOptions::default(), verifier)
    }

    /// Create a strategy with explicit options.
    ///
    /// Fails when `pass_req_to_callback` disagrees with the verifier's shape.
    pub fn with_options(options: StrategyOptions, verifier: Verifier<R, U>) -> StrategyResult<Self> {
        if options.pass_req_to_callback != verifier.accepts_request() {
            return Err(StrategyError::CallbackShapeMismatch {
                pass_req_to_callback: options.pass_req_to_callback,
            });
        }

        Ok(Self {
            name: STRATEGY_NAME.to_string(),
            options,
            verifier,
        })
    }

    pub fn builder() -> MobilePhoneStrategyBuilder<R, U> {
        MobilePhoneStrategyBuilder::default()
    }

    pub fn options(&self) -> &StrategyOptions {
        &self.options
    }

    /// Body first, then query; the first non-empty value wins
    fn extract(&self, req: &R, field: &str) -> Option<String> {
        req.body()
            .and_then(|body| lookup(body, field))
            .or_else(|| req.query().and_then(|query| lookup(query, field)))
    }

    /// Run [`Strategy::authenticate`] and wait for its outcome.
    ///
    /// Applies the configured verify timeout. A verify callback that drops
    /// its handler unresolved yields [`StrategyError::Abandoned`].
    pub async fn authenticate_outcome(&self, req: &R, options: &AuthenticateOptions) -> Outcome<U> {
        let (host, receiver) = OutcomeHost::channel();
        self.authenticate(req, options, Arc::new(host));

        let received = match self.options.verify_timeout {
            Some(limit) => match tokio::time::timeout(limit, receiver).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::warn!(
                        timeout_ms = limit.as_millis() as u64,
                        event = "verify_timeout",
                        "Verify callback did not resolve in time"
                    );
                    return Outcome::Error(StrategyError::VerifyTimeout(limit));
                }
            },
            None => receiver.await,
        };

        received.unwrap_or_else(|_| Outcome::Error(StrategyError::Abandoned))
    }
}

impl<R, U> Strategy<R, U> for MobilePhoneStrategy<R, U>
where
    R: CredentialSource + 'static,
    U: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn authenticate(
        &self,
        req: &R,
        options: &AuthenticateOptions,
        host: Arc<dyn AuthenticationHost<U>>,
    ) {
        let phone_number = self.extract(req, &self.options.phone_number_field);
        let verify_code = self.extract(req, &self.options.verify_code_field);

        let masked_phone = phone_number
            .as_deref()
            .map(mask_phone_number)
            .unwrap_or_default();
        let signal = Arc::new(Signal::new(host, masked_phone));

        let (phone_number, verify_code) = match (phone_number, verify_code) {
            (Some(phone_number), Some(verify_code)) => (phone_number, verify_code),
            (phone_number, verify_code) => {
                tracing::debug!(
                    has_phone_number = phone_number.is_some(),
                    has_verify_code = verify_code.is_some(),
                    event = "missing_credentials",
                    "Request is missing phone number or verify code"
                );
                signal.fail(
                    Challenge::new(options.missing_credentials_message()),
                    Some(BAD_REQUEST),
                    StrategyError::MissingCredentials,
                );
                return;
            }
        };

        if let Some(pattern) = &self.options.phone_number_pattern {
            let tested = panic::catch_unwind(AssertUnwindSafe(|| pattern.test(&phone_number)))
                .unwrap_or_else(|panic_info| Err(panic_fault(&*panic_info)));
            match tested {
                Ok(true) => {}
                Ok(false) => {
                    signal.fail(
                        Challenge::new(options.invalid_phone_number_message()),
                        Some(BAD_REQUEST),
                        StrategyError::InvalidPhoneFormat,
                    );
                    return;
                }
                Err(fault) => {
                    signal.error(StrategyError::PatternFault(fault));
                    return;
                }
            }
        }

        let done = Done::new(Arc::clone(&signal));
        signal.begin_dispatch();
        let dispatched = panic::catch_unwind(AssertUnwindSafe(|| {
            match (&self.verifier, self.options.pass_req_to_callback) {
                (Verifier::WithRequest(verify), true) => {
                    verify(req, &phone_number, &verify_code, done).map_err(StrategyError::CallbackFault)
                }
                (Verifier::Credentials(verify), false) => {
                    verify(&phone_number, &verify_code, done).map_err(StrategyError::CallbackFault)
                }
                _ => Err(StrategyError::CallbackShapeMismatch {
                    pass_req_to_callback: self.options.pass_req_to_callback,
                }),
            }
        }))
        .unwrap_or_else(|panic_info| Err(StrategyError::CallbackFault(panic_fault(&*panic_info))));

        if let Err(error) = dispatched {
            signal.error(error);
        }
        signal.finish_dispatch();
    }
}

/// Turn a caught panic payload into a fault for the error channel
fn panic_fault(panic_info: &(dyn Any + Send)) -> BoxError {
    let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    format!("panicked: {}", message).into()
}

impl<R, U> fmt::Debug for MobilePhoneStrategy<R, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MobilePhoneStrategy")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("accepts_request", &self.verifier.accepts_request())
            .finish()
    }
}

/// Builder for [`MobilePhoneStrategy`]
pub struct MobilePhoneStrategyBuilder<R, U> {
    name: Option<String>,
    options: StrategyOptions,
    verifier: Option<Verifier<R, U>>,
}

impl<R, U> Default for MobilePhoneStrategyBuilder<R, U> {
    fn default() -> Self {
        Self {
            name: None,
            options: StrategyOptions::default(),
            verifier: None,
        }
    }
}

impl<R, U> MobilePhoneStrategyBuilder<R, U>
where
    R: CredentialSource + 'static,
    U: Send + 'static,
{
    /// Register under a different name than `mobilePhone`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn options(mut self, options: StrategyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn phone_number_field(mut self, field: impl Into<String>) -> Self {
        self.options = self.options.with_phone_number_field(field);
        self
    }

    pub fn verify_code_field(mut self, field: impl Into<String>) -> Self {
        self.options = self.options.with_verify_code_field(field);
        self
    }

    pub fn phone_number_pattern(mut self, pattern: impl PhoneNumberPattern + 'static) -> Self {
        self.options = self.options.with_phone_number_pattern(pattern);
        self
    }

    pub fn pass_req_to_callback(mut self, pass: bool) -> Self {
        self.options = self.options.with_pass_req_to_callback(pass);
        self
    }

    pub fn verify_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_verify_timeout(timeout);
        self
    }

    pub fn verifier(mut self, verifier: Verifier<R, U>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn build(self) -> StrategyResult<MobilePhoneStrategy<R, U>> {
        let verifier = self.verifier.ok_or(StrategyError::MissingVerifyCallback)?;
        let mut strategy = MobilePhoneStrategy::with_options(self.options, verifier)?;
        if let Some(name) = self.name {
            strategy.name = name;
        }
        Ok(strategy)
    }
}
