//! actix-web host for the mobile phone strategy
//!
//! Exposed as a library so the integration tests can build the same app
//! the binary serves.

pub mod app;
pub mod config;
pub mod demo;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use app::create_app;
pub use extract::HttpCredentials;
pub use routes::auth::AppState;
