//! # advisor-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment
//! (`API_TOKEN`, `API_PORT`, `FEEDBACK_FILE`, `LOG_FORMAT`, `RUST_LOG`).

use std::net::SocketAddr;

use advisor_api::state::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("configuration error: {e}");
        e
    })?;
    tracing::info!(?config, "configuration loaded");

    let port = config.port;
    let app = advisor_api::app(AppState::with_config(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("advisor API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
