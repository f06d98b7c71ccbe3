//! Service description and health probe.

use std::collections::BTreeMap;

use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// `GET /` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Endpoint name to path.
    pub endpoints: BTreeMap<String, String>,
}

/// `GET /api/v1/health` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/api/v1/health", get(health))
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service description", body = ServiceInfo)),
    tag = "info"
)]
pub async fn service_info() -> Json<ServiceInfo> {
    let endpoints = [
        ("reward_calculation", "/api/v1/reward/calculate"),
        ("reward_simulation", "/api/v1/reward/simulate"),
        ("agent_class", "/api/v1/agent/class"),
        ("feedback", "/api/v1/feedback"),
        ("health", "/api/v1/health"),
        ("openapi", "/openapi.json"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), path.to_string()))
    .collect();

    Json(ServiceInfo {
        name: "Commission Advisor API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Commission reward and agent tier rules over REST".to_string(),
        endpoints,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "info"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
