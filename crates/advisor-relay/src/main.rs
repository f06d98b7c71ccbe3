//! # advisor-relay server entry point
//!
//! Configuration via environment variables:
//! - `OPENAI_API_KEY`: upstream bearer key.
//! - `INTERNAL_APP_TOKEN`: expected `X-MyAgent-Token`.
//! - `PORT`: listen port (default: 8080).
//! - `RELAY_UPSTREAM_URL`, `RELAY_TIMEOUT_SECS`: upstream endpoint and timeout.
//! - `LOG_FORMAT=json`: JSON log lines.

use tracing_subscriber::EnvFilter;

use advisor_relay::{app, RelayConfig, RelayState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = RelayConfig::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; chat requests will fail until it is configured");
    }
    if config.app_token.is_none() {
        tracing::warn!("INTERNAL_APP_TOKEN not set; every chat request will be refused");
    }
    tracing::info!(?config, "relay configuration loaded");

    let addr = format!("0.0.0.0:{}", config.port);
    let state = RelayState::new(config)?;

    tracing::info!("advisor-relay listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
