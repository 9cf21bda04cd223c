use std::io::Write;
use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use mps_api::config::Config;
use mps_api::demo::{self, InMemoryCodeStore};
use mps_api::{create_app, AppState};
use mps_core::MobilePhoneStrategy;
use mps_shared::{LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env();
    init_logger(&config.app.logging);

    info!("Starting mobile phone strategy demo ({})", config.environment());

    let options = config
        .strategy_options()
        .context("invalid strategy configuration")?;

    let store = Arc::new(InMemoryCodeStore::from_env());
    if store.is_empty().await {
        warn!("MPS_DEMO_CODES is empty; every login will be rejected");
    }

    let verifier = demo::verifier(store, options.pass_req_to_callback);
    let strategy = MobilePhoneStrategy::with_options(options, verifier)
        .context("failed to construct the mobile phone strategy")?;
    let state = web::Data::new(AppState::new(strategy).with_options(config.authenticate.clone()));

    let server_config = config.server().clone();
    let bind_address = server_config.bind_address();
    info!("Server will bind to: {}", bind_address);

    let max_payload_size = server_config.max_payload_size;
    let mut server = HttpServer::new(move || create_app(state.clone(), max_payload_size));
    if server_config.workers > 0 {
        server = server.workers(server_config.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}

fn init_logger(logging: &LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&logging.filter_directive());

    match logging.format {
        LogFormat::Json => {
            let source_location = logging.source_location;
            builder.format(move |buf, record| {
                let mut line = serde_json::json!({
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                    "level": record.level().to_string(),
                    "target": record.target(),
                    "message": record.args().to_string(),
                });
                if source_location {
                    line["file"] = serde_json::json!(record.file());
                    line["line"] = serde_json::json!(record.line());
                }
                writeln!(buf, "{}", line)
            });
        }
        LogFormat::Pretty => {
            builder.format_module_path(logging.source_location);
        }
        LogFormat::Compact => {
            builder.format_timestamp(None).format_target(false);
        }
    }

    builder.init();
}
