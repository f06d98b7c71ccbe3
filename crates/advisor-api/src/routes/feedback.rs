//! # Feedback API
//!
//! - **POST `/api/v1/feedback`**: submit feedback
//! - **GET `/api/v1/feedback`**: list stored feedback, newest last
//!
//! The store does blocking file I/O, so handlers run it on the blocking pool.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, Validate};
use crate::feedback::{FeedbackEntry, FeedbackStatus, NewFeedback};
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 100;

fn default_user_id() -> String {
    "anonymous".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

fn empty_context() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Request body for `POST /api/v1/feedback`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitFeedbackRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub message: String,
    /// Free-form context from the caller.
    #[serde(default = "empty_context")]
    #[schema(value_type = Object)]
    pub context: serde_json::Value,
}

impl Validate for SubmitFeedbackRequest {
    fn validate(&self) -> Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("message must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub feedback_id: String,
    pub message: String,
}

/// Query parameters for `GET /api/v1/feedback`.
#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    /// `pending`, `reviewed` or `resolved`.
    pub status: Option<String>,
    /// Keep only the newest `limit` entries (default 100; 0 or less returns none).
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackListResponse {
    pub feedback: Vec<FeedbackEntry>,
    pub count: usize,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/feedback", get(list_feedback).post(submit_feedback))
}

/// POST /api/v1/feedback
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 200, description = "Feedback stored", body = SubmitFeedbackResponse),
        (status = 400, description = "Missing or empty message", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API token", body = crate::error::ErrorBody),
        (status = 500, description = "Feedback file unreadable or unwritable", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    body: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<Json<SubmitFeedbackResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let new = NewFeedback {
        user_id: req.user_id,
        category: req.category,
        message: req.message,
        context: req.context,
    };

    let store = state.feedback.clone();
    let entry = tokio::task::spawn_blocking(move || store.submit(new))
        .await
        .map_err(|e| AppError::Internal(format!("feedback task failed: {e}")))??;

    Ok(Json(SubmitFeedbackResponse {
        success: true,
        feedback_id: entry.id,
        message: "Feedback submitted successfully".to_string(),
    }))
}

/// GET /api/v1/feedback
#[utoipa::path(
    get,
    path = "/api/v1/feedback",
    params(FeedbackQuery),
    responses(
        (status = 200, description = "Stored feedback, oldest first", body = FeedbackListResponse),
        (status = 400, description = "Invalid query parameters", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API token", body = crate::error::ErrorBody),
        (status = 500, description = "Feedback file unreadable", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    query: Result<Query<FeedbackQuery>, QueryRejection>,
) -> Result<Json<FeedbackListResponse>, AppError> {
    let params = extract_query(query)?;

    let status = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<FeedbackStatus>().map_err(AppError::Validation)?),
        None => None,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(0);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    let store = state.feedback.clone();
    let feedback = tokio::task::spawn_blocking(move || store.list(status, limit))
        .await
        .map_err(|e| AppError::Internal(format!("feedback task failed: {e}")))??;

    Ok(Json(FeedbackListResponse {
        count: feedback.len(),
        feedback,
    }))
}
