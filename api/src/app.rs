//! Application factory
//!
//! Builds the actix-web `App` serving the mobile phone strategy so the
//! binary and the integration tests share one wiring.

use actix_web::{middleware::Logger, web, App, HttpResponse};
use serde::Serialize;

use mps_shared::{error_codes, ErrorResponse};

use crate::routes::{self, auth::AppState};

/// Create and configure the application around `app_state`
pub fn create_app<U>(
    app_state: web::Data<AppState<U>>,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: Serialize + Send + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::PayloadConfig::new(max_payload_size))
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        .configure(routes::configure::<U>)
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "mobile-phone-strategy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
