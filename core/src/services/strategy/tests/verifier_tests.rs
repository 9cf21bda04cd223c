//! Tests for asynchronous verifiers and awaited outcomes

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::CredentialRequest;
use crate::errors::{BoxError, StrategyError};
use crate::services::strategy::{
    AuthenticateOptions, CredentialSource, MobilePhoneStrategy, Outcome, OutcomeKind,
    StrategyOptions, Verifier,
};

use super::mocks::{credentials, run, InMemoryCodes, TestUser};

fn code_store() -> Arc<InMemoryCodes> {
    let codes = InMemoryCodes::new(false);
    codes.insert("13800000000", "123456", TestUser { id: 1 });
    Arc::new(codes)
}

#[tokio::test]
async fn test_service_verifier_accepts_matching_code() {
    let strategy = MobilePhoneStrategy::new(Verifier::from_service(code_store())).unwrap();

    let outcome = strategy
        .authenticate_outcome(&credentials("13800000000", "123456"), &AuthenticateOptions::default())
        .await;

    assert_eq!(outcome.user(), Some(&TestUser { id: 1 }));
}

#[tokio::test]
async fn test_service_verifier_rejects_wrong_code() {
    let strategy = MobilePhoneStrategy::new(Verifier::from_service(code_store())).unwrap();

    let outcome = strategy
        .authenticate_outcome(&credentials("13800000000", "000000"), &AuthenticateOptions::default())
        .await;

    assert_eq!(outcome.kind(), OutcomeKind::Fail);
    assert_eq!(outcome.status(), None);
}

#[tokio::test]
async fn test_service_fault_is_error_outcome() {
    let strategy =
        MobilePhoneStrategy::new(Verifier::from_service(Arc::new(InMemoryCodes::new(true)))).unwrap();

    let outcome = strategy
        .authenticate_outcome(&credentials("13800000000", "123456"), &AuthenticateOptions::default())
        .await;

    match outcome {
        Outcome::Error(StrategyError::VerificationFault(source)) => {
            assert_eq!(source.to_string(), "db down");
        }
        other => panic!("expected verification fault, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_credentials_resolve_without_runtime_work() {
    let strategy = MobilePhoneStrategy::new(Verifier::from_service(code_store())).unwrap();

    let outcome = strategy
        .authenticate_outcome(&CredentialRequest::new(), &AuthenticateOptions::default())
        .await;

    assert_eq!(outcome.status(), Some(400));
}

#[tokio::test]
async fn test_handler_resolved_from_spawned_task() {
    let strategy = MobilePhoneStrategy::new(Verifier::credentials(|phone_number, _code, done| {
        let phone_number = phone_number.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            done.success_with_info(TestUser { id: 9 }, json!({ "phone": phone_number }));
        });
        Ok(())
    }))
    .unwrap();

    let outcome = strategy
        .authenticate_outcome(&credentials("13800000000", "1234"), &AuthenticateOptions::default())
        .await;

    match outcome {
        Outcome::Success { user, info } => {
            assert_eq!(user.id, 9);
            assert_eq!(info, Some(json!({"phone": "13800000000"})));
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_verify_timeout() {
    let options = StrategyOptions::default().with_verify_timeout(Duration::from_secs(5));
    let strategy = MobilePhoneStrategy::with_options(
        options,
        Verifier::from_async(|_phone, _code| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, BoxError>(Some(TestUser { id: 1 }))
        }),
    )
    .unwrap();

    let outcome = strategy
        .authenticate_outcome(&credentials("13800000000", "1234"), &AuthenticateOptions::default())
        .await;

    assert!(matches!(
        outcome,
        Outcome::Error(StrategyError::VerifyTimeout(limit)) if limit == Duration::from_secs(5)
    ));
}

#[tokio::test]
async fn test_dropped_handler_is_abandoned() {
    let strategy = MobilePhoneStrategy::<CredentialRequest, TestUser>::new(Verifier::credentials(
        |_phone, _code, done| {
            drop(done);
            Ok(())
        },
    ))
    .unwrap();

    let outcome = strategy
        .authenticate_outcome(&credentials("13800000000", "1234"), &AuthenticateOptions::default())
        .await;

    assert!(matches!(outcome, Outcome::Error(StrategyError::Abandoned)));
}

#[tokio::test]
async fn test_async_verifier_with_request() {
    let options = StrategyOptions::default().with_pass_req_to_callback(true);
    let strategy = MobilePhoneStrategy::with_options(
        options,
        Verifier::from_async_with_request(|req: CredentialRequest, phone_number, _code| async move {
            let channel = req
                .query()
                .and_then(|query| query.get("channel"))
                .and_then(|value| value.as_str())
                .map(str::to_owned);
            Ok::<_, BoxError>(Some(TestUser {
                id: if channel.as_deref() == Some("app") && phone_number == "13800000000" { 7 } else { 0 },
            }))
        }),
    )
    .unwrap();
    let request = credentials("13800000000", "1234").with_query_field("channel", "app");

    let outcome = strategy
        .authenticate_outcome(&request, &AuthenticateOptions::default())
        .await;

    assert_eq!(outcome.user(), Some(&TestUser { id: 7 }));
}

#[test]
fn test_async_verifier_without_runtime_is_callback_fault() {
    let strategy = MobilePhoneStrategy::new(Verifier::from_service(code_store())).unwrap();

    let outcomes = run(&strategy, &credentials("13800000000", "123456"), &AuthenticateOptions::default());

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        &outcomes[0],
        Outcome::Error(StrategyError::CallbackFault(_))
    ));
}
