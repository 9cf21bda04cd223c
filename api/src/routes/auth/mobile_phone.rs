use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::handlers::authenticate_http;

use super::AppState;

/// Handler for POST /auth/mobile-phone
///
/// Reads `phoneNumber` and `verifyCode` (or the configured field names)
/// from a JSON or urlencoded body, falling back to the query string.
///
/// # Request Body
///
/// ```json
/// {
///     "phoneNumber": "13800000000",
///     "verifyCode": "123456"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "user": { ... },
///     "info": { ... }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing credentials or malformed phone number
/// - 401 Unauthorized: Code rejected by the verifier
/// - 500 Internal Server Error: Verifier or pattern fault
pub async fn mobile_phone_login<U>(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState<U>>,
) -> HttpResponse
where
    U: Serialize + Send + 'static,
{
    authenticate_http(&state.strategy, &req, &body, &state.options).await
}
