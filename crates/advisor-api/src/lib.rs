//! # advisor-api: Commission Advisor REST API
//!
//! Thin HTTP surface over `advisor-core`, plus a JSON-file feedback store.
//!
//! ## API Surface
//!
//! | Route                          | Module                   | Auth |
//! |--------------------------------|--------------------------|------|
//! | `GET /`                        | [`routes::info`]         | no   |
//! | `GET /api/v1/health`           | [`routes::info`]         | no   |
//! | `GET /openapi.json`            | [`openapi`]              | no   |
//! | `POST /api/v1/reward/calculate`| [`routes::reward`]       | yes  |
//! | `POST /api/v1/reward/simulate` | [`routes::reward`]       | yes  |
//! | `POST /api/v1/agent/class`     | [`routes::agent_class`]  | yes  |
//! | `GET/POST /api/v1/feedback`    | [`routes::feedback`]     | yes  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod feedback;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the application router.
///
/// Service info, health and the OpenAPI document sit outside the auth
/// middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::reward::router())
        .merge(routes::agent_class::router())
        .merge(routes::feedback::router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(from_fn(auth::auth_middleware))
        .layer(Extension(auth_config))
        .with_state(state.clone());

    let unauthenticated = Router::new()
        .merge(routes::info::router())
        .merge(openapi::router())
        .with_state(state);

    Router::new()
        .merge(unauthenticated)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
