//! In-memory verification code store used by the demo binary

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use mps_core::{BoxError, CredentialSource, PhoneCodeVerifier, Verifier};
use mps_shared::phone::{mask_phone_number, normalize_phone_number};

use crate::extract::HttpCredentials;

/// Wrong guesses allowed before a code is locked
pub const MAX_ATTEMPTS: u32 = 3;

/// User handed back after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUser {
    pub id: Uuid,
    pub phone_number: String,
}

struct IssuedCode {
    code: String,
    attempts: u32,
}

/// One-time codes keyed by normalized phone number.
///
/// A code is consumed by the first matching guess and locked after
/// [`MAX_ATTEMPTS`] wrong ones.
#[derive(Default)]
pub struct InMemoryCodeStore {
    codes: Mutex<HashMap<String, IssuedCode>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from `MPS_DEMO_CODES`, formatted `phone:code,phone:code`
    pub fn from_env() -> Self {
        env::var("MPS_DEMO_CODES")
            .map(|seed| Self::from_pairs(&seed))
            .unwrap_or_default()
    }

    /// Parse `phone:code` pairs separated by commas; malformed pairs are skipped
    pub fn from_pairs(seed: &str) -> Self {
        let codes = seed
            .split(',')
            .filter_map(|pair| pair.split_once(':'))
            .map(|(phone, code)| (normalize_phone_number(phone.trim()), code.trim()))
            .filter(|(phone, code)| !phone.is_empty() && !code.is_empty())
            .map(|(phone, code)| {
                (
                    phone,
                    IssuedCode {
                        code: code.to_string(),
                        attempts: 0,
                    },
                )
            })
            .collect();

        Self {
            codes: Mutex::new(codes),
        }
    }

    pub async fn issue(&self, phone_number: &str, code: &str) {
        self.codes.lock().await.insert(
            normalize_phone_number(phone_number),
            IssuedCode {
                code: code.to_string(),
                attempts: 0,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.codes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.codes.lock().await.is_empty()
    }
}

#[async_trait]
impl PhoneCodeVerifier<DemoUser> for InMemoryCodeStore {
    async fn verify(&self, phone_number: &str, verify_code: &str) -> Result<Option<DemoUser>, BoxError> {
        let phone_number = normalize_phone_number(phone_number);
        let mut codes = self.codes.lock().await;

        let Some(issued) = codes.get_mut(&phone_number) else {
            log::debug!("No code issued for {}", mask_phone_number(&phone_number));
            return Ok(None);
        };

        issued.attempts += 1;
        if issued.attempts > MAX_ATTEMPTS {
            log::warn!("Code locked for {}", mask_phone_number(&phone_number));
            return Ok(None);
        }
        if issued.code != verify_code {
            return Ok(None);
        }

        codes.remove(&phone_number);
        Ok(Some(DemoUser {
            id: Uuid::new_v4(),
            phone_number,
        }))
    }
}

/// Verify callback backed by `store`, in the shape `pass_req_to_callback` asks for
pub fn verifier(
    store: Arc<InMemoryCodeStore>,
    pass_req_to_callback: bool,
) -> Verifier<HttpCredentials, DemoUser> {
    if !pass_req_to_callback {
        return Verifier::from_service(store);
    }

    Verifier::from_async_with_request(move |req: HttpCredentials, phone_number, verify_code| {
        let store = Arc::clone(&store);
        async move {
            if req.body().is_none() {
                log::debug!("Credentials for {} came from the query string", mask_phone_number(&phone_number));
            }
            store.verify(&phone_number, &verify_code).await
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_code_is_single_use() {
        let store = InMemoryCodeStore::new();
        store.issue("138-0000-0000", "123456").await;

        let user = store.verify("13800000000", "123456").await.unwrap();
        assert_eq!(user.unwrap().phone_number, "13800000000");
        assert!(store.verify("13800000000", "123456").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_code_locks_after_max_attempts() {
        let store = InMemoryCodeStore::new();
        store.issue("13800000000", "123456").await;

        for _ in 0..MAX_ATTEMPTS {
            assert!(store.verify("13800000000", "000000").await.unwrap().is_none());
        }
        assert!(store.verify("13800000000", "123456").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_from_pairs_skips_malformed() {
        let store = InMemoryCodeStore::from_pairs("13800000000:1234, broken, :9999,13900000000:");
        assert_eq!(store.len().await, 1);
        assert!(store.verify("13800000000", "1234").await.unwrap().is_some());
    }
}
