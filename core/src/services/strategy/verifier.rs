//! Verify callback shapes

use std::future::Future;
use std::sync::Arc;

use crate::errors::BoxError;

use super::done::Done;
use super::traits::PhoneCodeVerifier;

type CredentialsFn<U> = dyn Fn(&str, &str, Done<U>) -> Result<(), BoxError> + Send + Sync;
type WithRequestFn<R, U> = dyn Fn(&R, &str, &str, Done<U>) -> Result<(), BoxError> + Send + Sync;

/// Application-supplied verify callback.
///
/// The callback resolves its [`Done`] handler now or later, e.g. from a
/// spawned task. An `Err` returned from the call itself is reported on the
/// host's error channel.
pub enum Verifier<R, U> {
    /// `(phone_number, verify_code, done)`
    Credentials(Arc<CredentialsFn<U>>),
    /// `(request, phone_number, verify_code, done)`
    WithRequest(Arc<WithRequestFn<R, U>>),
}

impl<R, U> Clone for Verifier<R, U> {
    fn clone(&self) -> Self {
        match self {
            Verifier::Credentials(f) => Verifier::Credentials(Arc::clone(f)),
            Verifier::WithRequest(f) => Verifier::WithRequest(Arc::clone(f)),
        }
    }
}

impl<R: 'static, U: Send + 'static> Verifier<R, U> {
    pub fn credentials<F>(f: F) -> Self
    where
        F: Fn(&str, &str, Done<U>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Verifier::Credentials(Arc::new(f))
    }

    pub fn with_request<F>(f: F) -> Self
    where
        F: Fn(&R, &str, &str, Done<U>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Verifier::WithRequest(Arc::new(f))
    }

    /// Run an async check on the current tokio runtime and resolve the
    /// handler with its result. Dispatch fails when no runtime is running.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<U>, BoxError>> + Send + 'static,
    {
        Self::credentials(move |phone_number, verify_code, done| {
            spawn_resolve(f(phone_number.to_owned(), verify_code.to_owned()), done)
        })
    }

    /// Like [`Verifier::from_async`], with an owned copy of the request
    pub fn from_async_with_request<F, Fut>(f: F) -> Self
    where
        R: Clone + Send,
        F: Fn(R, String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<U>, BoxError>> + Send + 'static,
    {
        Self::with_request(move |req, phone_number, verify_code, done| {
            spawn_resolve(
                f(req.clone(), phone_number.to_owned(), verify_code.to_owned()),
                done,
            )
        })
    }

    /// Delegate to a [`PhoneCodeVerifier`] implementation
    pub fn from_service<V>(service: Arc<V>) -> Self
    where
        V: PhoneCodeVerifier<U> + 'static,
    {
        Self::from_async(move |phone_number, verify_code| {
            let service = Arc::clone(&service);
            async move { service.verify(&phone_number, &verify_code).await }
        })
    }
}

impl<R, U> Verifier<R, U> {
    /// Whether this callback expects the request as its first argument
    pub fn accepts_request(&self) -> bool {
        matches!(self, Verifier::WithRequest(_))
    }
}

fn spawn_resolve<U, Fut>(verification: Fut, done: Done<U>) -> Result<(), BoxError>
where
    U: Send + 'static,
    Fut: Future<Output = Result<Option<U>, BoxError>> + Send + 'static,
{
    let runtime = tokio::runtime::Handle::try_current()?;
    runtime.spawn(async move {
        done.complete(verification.await, None);
    });
    Ok(())
}
