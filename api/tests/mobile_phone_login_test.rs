//! Integration tests for the mobile phone login endpoint

use std::sync::Arc;

use actix_web::{http::header, test, web};
use mps_api::create_app;
use mps_api::demo::{self, DemoUser, InMemoryCodeStore};
use mps_api::{AppState, HttpCredentials};
use mps_core::{AuthenticateOptions, BoxError, MobilePhoneStrategy, StrategyOptions, Verifier};
use mps_shared::phone;
use serde_json::{json, Value};

const MAX_PAYLOAD: usize = 64 * 1024;

async fn seeded_store() -> Arc<InMemoryCodeStore> {
    let store = Arc::new(InMemoryCodeStore::new());
    store.issue("13800000000", "123456").await;
    store
}

fn state(
    options: StrategyOptions,
    verifier: Verifier<HttpCredentials, DemoUser>,
) -> web::Data<AppState<DemoUser>> {
    let strategy = MobilePhoneStrategy::with_options(options, verifier).unwrap();
    web::Data::new(AppState::new(strategy))
}

async fn post_json(app_state: web::Data<AppState<DemoUser>>, uri: &str, body: Value) -> (u16, Value) {
    let app = test::init_service(create_app(app_state, MAX_PAYLOAD)).await;
    let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_login_success() {
    let store = seeded_store().await;
    let app_state = state(StrategyOptions::default(), demo::verifier(store, false));

    let (status, body) = post_json(
        app_state,
        "/auth/mobile-phone",
        json!({"phoneNumber": "13800000000", "verifyCode": "123456"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["user"]["phone_number"], "13800000000");
    assert!(body.get("info").is_none());
}

#[actix_web::test]
async fn test_missing_code_is_bad_request() {
    let store = seeded_store().await;
    let app_state = state(StrategyOptions::default(), demo::verifier(store, false));

    let (status, body) =
        post_json(app_state, "/auth/mobile-phone", json!({"phoneNumber": "13800000000"})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "MISSING_CREDENTIALS");
    assert_eq!(body["message"], "Missing credentials");
}

#[actix_web::test]
async fn test_pattern_mismatch_is_bad_request() {
    let store = seeded_store().await;
    let options = StrategyOptions::default().with_phone_number_pattern(phone::china_mobile());
    let app_state = state(options, demo::verifier(store, false));

    let (status, body) = post_json(
        app_state,
        "/auth/mobile-phone",
        json!({"phoneNumber": "12345", "verifyCode": "123456"}),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_PHONE_NUMBER");
    assert_eq!(body["message"], "Validator Error phoneNumber");
}

#[actix_web::test]
async fn test_wrong_code_is_unauthorized() {
    let store = seeded_store().await;
    let app_state = state(StrategyOptions::default(), demo::verifier(store, false));

    let (status, body) = post_json(
        app_state,
        "/auth/mobile-phone",
        json!({"phoneNumber": "13800000000", "verifyCode": "000000"}),
    )
    .await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "AUTHENTICATION_FAILED");
}

#[actix_web::test]
async fn test_verifier_fault_is_internal_error() {
    let verifier = Verifier::from_async(|_phone_number, _verify_code| async {
        Err::<Option<DemoUser>, BoxError>("db down".into())
    });
    let app_state = state(StrategyOptions::default(), verifier);

    let (status, body) = post_json(
        app_state,
        "/auth/mobile-phone",
        json!({"phoneNumber": "13800000000", "verifyCode": "123456"}),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "INTERNAL_ERROR");
    assert!(!body["message"].as_str().unwrap().contains("db down"));
    assert!(body["details"]["request_id"].is_string());
}

#[actix_web::test]
async fn test_form_body() {
    let store = seeded_store().await;
    let app_state = state(StrategyOptions::default(), demo::verifier(store, false));
    let app = test::init_service(create_app(app_state, MAX_PAYLOAD)).await;

    let req = test::TestRequest::post()
        .uri("/auth/mobile-phone")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("phoneNumber=13800000000&verifyCode=123456")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_query_fallback_with_request_callback() {
    let store = seeded_store().await;
    let options = StrategyOptions::default().with_pass_req_to_callback(true);
    let app_state = state(options, demo::verifier(store, true));
    let app = test::init_service(create_app(app_state, MAX_PAYLOAD)).await;

    let req = test::TestRequest::post()
        .uri("/auth/mobile-phone?phoneNumber=13800000000&verifyCode=123456")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_custom_fields_and_messages() {
    let store = seeded_store().await;
    let options = StrategyOptions::default()
        .with_phone_number_field("user[phone]")
        .with_verify_code_field("code");
    let strategy = MobilePhoneStrategy::with_options(options, demo::verifier(store, false)).unwrap();
    let app_state = web::Data::new(
        AppState::new(strategy)
            .with_options(AuthenticateOptions::default().with_bad_request_message("Fill in both fields")),
    );

    let (status, body) = post_json(
        app_state.clone(),
        "/auth/mobile-phone",
        json!({"phoneNumber": "13800000000", "verifyCode": "123456"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Fill in both fields");

    let (status, body) = post_json(
        app_state,
        "/auth/mobile-phone",
        json!({"user": {"phone": "13800000000"}, "code": "123456"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["phone_number"], "13800000000");
}

#[actix_web::test]
async fn test_health_and_not_found() {
    let store = seeded_store().await;
    let app_state = state(StrategyOptions::default(), demo::verifier(store, false));
    let app = test::init_service(create_app(app_state, MAX_PAYLOAD)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_verifier_panic_is_internal_error() {
    let verifier = Verifier::credentials(|_phone_number, _verify_code, _done| -> Result<(), BoxError> {
        panic!("verifier crashed")
    });
    let app_state = state(StrategyOptions::default(), verifier);

    let (status, body) = post_json(
        app_state,
        "/auth/mobile-phone",
        json!({"phoneNumber": "13800000000", "verifyCode": "123456"}),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "INTERNAL_ERROR");
}
