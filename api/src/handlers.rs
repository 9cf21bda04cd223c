//! Mapping of strategy outcomes onto HTTP responses

use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use mps_core::{AuthenticateOptions, MobilePhoneStrategy, Outcome, StrategyError};
use mps_shared::{error_codes, ErrorResponse};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::extract::HttpCredentials;

/// Body returned when authentication succeeds
#[derive(Debug, Serialize)]
pub struct AuthenticatedResponse<U> {
    pub user: U,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

/// Run `strategy` against an HTTP request and its raw payload
pub async fn authenticate_http<U>(
    strategy: &MobilePhoneStrategy<HttpCredentials, U>,
    req: &HttpRequest,
    body: &[u8],
    options: &AuthenticateOptions,
) -> HttpResponse
where
    U: Serialize + Send + 'static,
{
    let request_id = Uuid::new_v4();
    log::debug!("Authentication started [request_id={}]", request_id);

    let credentials = HttpCredentials::from_request(req, body);
    let outcome = strategy.authenticate_outcome(&credentials, options).await;

    log::info!(
        "Authentication finished with {:?} [request_id={}]",
        outcome.kind(),
        request_id
    );
    outcome_response(outcome, request_id)
}

/// Turn an outcome into a response.
///
/// - success: 200 with the user and any info
/// - fail: the signalled status, 401 when none was given
/// - error: 500; the fault is logged, never echoed to the client
pub fn outcome_response<U: Serialize>(outcome: Outcome<U>, request_id: Uuid) -> HttpResponse {
    match outcome {
        Outcome::Success { user, info } => {
            HttpResponse::Ok().json(AuthenticatedResponse { user, info })
        }
        Outcome::Fail {
            challenge,
            status,
            reason,
        } => {
            let status = status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::UNAUTHORIZED);
            let error = match reason {
                StrategyError::MissingCredentials => error_codes::MISSING_CREDENTIALS,
                StrategyError::InvalidPhoneFormat => error_codes::INVALID_PHONE_NUMBER,
                _ => error_codes::AUTHENTICATION_FAILED,
            };
            let message = challenge
                .message
                .unwrap_or_else(|| String::from("Authentication failed"));

            HttpResponse::build(status).json(ErrorResponse::new(error, message))
        }
        Outcome::Error(error) => {
            if error.is_configuration_error() {
                log::error!("Strategy is misconfigured [request_id={}]: {}", request_id, error);
            } else {
                log::error!(
                    "Authentication could not be completed [request_id={}]: {}",
                    request_id, error
                );
            }
            HttpResponse::InternalServerError().json(
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
                    .add_detail("request_id", request_id.to_string()),
            )
        }
    }
}
