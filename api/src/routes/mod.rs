//! HTTP route handlers

pub mod auth;

use actix_web::web;
use serde::Serialize;

/// Register the authentication routes; `AppState<U>` must be in app data
pub fn configure<U>(cfg: &mut web::ServiceConfig)
where
    U: Serialize + Send + 'static,
{
    cfg.service(
        web::scope("/auth")
            .route("/mobile-phone", web::post().to(auth::mobile_phone_login::<U>)),
    );
}
