//! # advisor-relay: LLM Relay
//!
//! Forwards chat-completion requests from trusted clients to an upstream
//! LLM API. Clients authenticate with a shared `X-MyAgent-Token`; the
//! upstream key never leaves the server.
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | POST | `/openai/chat` | `X-MyAgent-Token` |
//! | GET  | `/health` | none |
//!
//! The request body is forwarded untouched with `Authorization: Bearer`.
//! The upstream status, body and content type are returned as-is.

pub mod config;
pub mod error;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, RelayConfig};
pub use error::RelayError;

pub const APP_TOKEN_HEADER: &str = "x-myagent-token";

/// Shared relay state, cheap to clone.
#[derive(Debug, Clone)]
pub struct RelayState {
    config: Arc<RelayConfig>,
    client: reqwest::Client,
}

impl RelayState {
    /// Build the state and its upstream HTTP client.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Constant-time token comparison. A length mismatch still runs a
/// comparison.
fn token_matches(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

fn authorized(config: &RelayConfig, headers: &HeaderMap) -> bool {
    let Some(expected) = config.app_token.as_ref() else {
        return false;
    };
    headers
        .get(APP_TOKEN_HEADER)
        .is_some_and(|v| token_matches(v.as_bytes(), expected.as_bytes()))
}

/// POST /openai/chat
async fn chat(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    if !authorized(&state.config, &headers) {
        return Err(RelayError::Forbidden);
    }
    let api_key = state
        .config
        .api_key
        .as_ref()
        .ok_or(RelayError::MissingApiKey)?;

    let upstream = state
        .client
        .post(state.config.upstream_url.clone())
        .bearer_auth(api_key.as_str())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let bytes = upstream.bytes().await?;

    tracing::info!(status = status.as_u16(), bytes = bytes.len(), "relayed chat request");
    Ok((status, [(CONTENT_TYPE, content_type)], bytes).into_response())
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Build the relay router.
pub fn app(state: RelayState) -> Router {
    Router::new()
        .route("/openai/chat", post(chat))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
