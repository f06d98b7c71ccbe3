//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Commission Advisor API",
        version = "0.1.0",
        description = "Commission reward calculation, reward simulation, agent tier classification and feedback intake.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::info::service_info,
        crate::routes::info::health,
        crate::routes::reward::calculate_reward,
        crate::routes::reward::simulate,
        crate::routes::agent_class::determine_class,
        crate::routes::feedback::submit_feedback,
        crate::routes::feedback::list_feedback,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::info::ServiceInfo,
        crate::routes::info::HealthResponse,
        crate::routes::reward::DealInput,
        crate::routes::reward::CalculateRewardRequest,
        crate::routes::reward::DealEcho,
        crate::routes::reward::RewardDetailResponse,
        crate::routes::reward::RewardCalculationResponse,
        crate::routes::reward::SimulateRewardRequest,
        crate::routes::reward::SimulationResponse,
        crate::routes::agent_class::ClassifyRequest,
        crate::routes::agent_class::ClassificationResponse,
        crate::routes::agent_class::PromotionGapResponse,
        crate::routes::feedback::SubmitFeedbackRequest,
        crate::routes::feedback::SubmitFeedbackResponse,
        crate::routes::feedback::FeedbackListResponse,
        crate::feedback::FeedbackEntry,
        crate::feedback::FeedbackStatus,
    )),
    tags(
        (name = "info", description = "Service description and health"),
        (name = "reward", description = "Commission reward calculation"),
        (name = "agent", description = "Agent tier classification"),
        (name = "feedback", description = "Feedback intake"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
