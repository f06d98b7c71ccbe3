//! POST `/api/v1/agent/class`: agent tier classification.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use advisor_core::{classify, AgentRecord, Amount, Classification, PromotionGap, Region};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

fn default_region() -> String {
    "capital".to_string()
}

/// Request body for `POST /api/v1/agent/class`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassifyRequest {
    /// `capital` or `other` (alias `local`). Defaults to `capital`.
    #[serde(default = "default_region")]
    pub region: String,
    /// Sales over the evaluation period. Defaults to 0.
    #[serde(default)]
    #[schema(value_type = f64)]
    pub period_sales: Amount,
    /// Closed cases to date. Defaults to 0.
    #[serde(default)]
    pub cumulative_cases: u32,
}

/// Distance to the next tier.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromotionGapResponse {
    #[schema(value_type = f64)]
    pub target_sales: Amount,
    pub target_cases: u32,
    #[schema(value_type = f64)]
    pub current_sales: Amount,
    pub current_cases: u32,
    #[schema(value_type = f64)]
    pub sales_gap: Amount,
    pub cases_gap: u32,
    pub sales_achieved: bool,
    pub cases_achieved: bool,
    pub can_promote: bool,
}

impl From<&PromotionGap> for PromotionGapResponse {
    fn from(g: &PromotionGap) -> Self {
        Self {
            target_sales: g.target_sales,
            target_cases: g.target_cases,
            current_sales: g.current_sales,
            current_cases: g.current_cases,
            sales_gap: g.sales_gap,
            cases_gap: g.cases_gap,
            sales_achieved: g.sales_achieved,
            cases_achieved: g.cases_achieved,
            can_promote: g.can_promote,
        }
    }
}

/// Response for `POST /api/v1/agent/class`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResponse {
    /// `Premier`, `Senior`, `Expert`, `Lead` or `Unranked`.
    pub class: String,
    /// `annual` or `half`; absent when unranked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub next_class: Option<String>,
    pub gap: Option<PromotionGapResponse>,
    /// Present only at the top tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Classification> for ClassificationResponse {
    fn from(c: &Classification) -> Self {
        Self {
            class: c.class.to_string(),
            period: c.period.map(|p| p.to_string()),
            next_class: c.next_class.map(|n| n.to_string()),
            gap: c.gap.as_ref().map(PromotionGapResponse::from),
            message: c.message.clone(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/agent/class", post(determine_class))
}

/// POST /api/v1/agent/class
#[utoipa::path(
    post,
    path = "/api/v1/agent/class",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Tier and gap to the next tier", body = ClassificationResponse),
        (status = 400, description = "Malformed body or unknown region", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API token", body = crate::error::ErrorBody),
    ),
    tag = "agent"
)]
pub async fn determine_class(
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassificationResponse>, AppError> {
    let req = extract_json(body)?;
    let region: Region = req.region.parse()?;
    let record = AgentRecord::new(region, req.period_sales, req.cumulative_cases);
    Ok(Json(ClassificationResponse::from(&classify(&record))))
}
