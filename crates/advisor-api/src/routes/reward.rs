//! # Reward API
//!
//! - **POST `/api/v1/reward/calculate`**: rewards for an ordered batch of deals
//! - **POST `/api/v1/reward/simulate`**: what-if for one prospective deal
//!
//! Handlers only translate between wire DTOs and `advisor-core` types; the
//! rate schedule and bonus logic live in the core crate.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use advisor_core::deal::parse_date;
use advisor_core::{
    calculate_rewards, simulate_reward, AdvisorError, Amount, Deal, DealSource, RewardDetail,
    RewardOutcome, RewardSimulation,
};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

fn default_source() -> String {
    "self".to_string()
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// One deal in a calculation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DealInput {
    /// Tax-excluded brokerage fee, as a number or decimal string. Defaults to 0.
    #[serde(default)]
    #[schema(value_type = f64)]
    pub tax_excluded_fee: Amount,
    /// `self_discovered`, `hq_referral`, `partner_offer` or an alias. Defaults to `self`.
    #[serde(default = "default_source")]
    pub source: String,
    /// `YYYY-MM-DD`. Defaults to today.
    #[serde(default)]
    pub date: Option<String>,
}

impl DealInput {
    fn into_deal(self, today: NaiveDate) -> Result<Deal, AdvisorError> {
        let source: DealSource = self.source.parse()?;
        let date = match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_date(raw)?,
            _ => today,
        };
        Ok(Deal::new(self.tax_excluded_fee, source, date))
    }
}

/// Request body for `POST /api/v1/reward/calculate`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CalculateRewardRequest {
    /// Deals in processing order.
    pub deals: Vec<DealInput>,
    /// Fees already accumulated this year before the first deal.
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub year_to_date: Option<Amount>,
}

/// Deal as echoed back in a response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DealEcho {
    #[schema(value_type = f64)]
    pub tax_excluded_fee: Amount,
    pub source: String,
    pub date: NaiveDate,
}

impl From<&Deal> for DealEcho {
    fn from(d: &Deal) -> Self {
        Self {
            tax_excluded_fee: d.fee(),
            source: d.source().to_string(),
            date: d.date(),
        }
    }
}

/// Per-deal reward.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RewardDetailResponse {
    pub deal: DealEcho,
    #[schema(value_type = f64)]
    pub reward_amount: Amount,
    /// Fraction, e.g. `0.75`.
    pub rate_applied: f64,
    pub bonus_activated: bool,
    #[schema(value_type = f64)]
    pub year_to_date_after: Amount,
}

impl From<&RewardDetail> for RewardDetailResponse {
    fn from(d: &RewardDetail) -> Self {
        Self {
            deal: DealEcho::from(&d.deal),
            reward_amount: d.reward_amount,
            rate_applied: d.rate_applied.as_f64(),
            bonus_activated: d.bonus_activated,
            year_to_date_after: d.year_to_date_after,
        }
    }
}

/// Response for `POST /api/v1/reward/calculate`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RewardCalculationResponse {
    #[schema(value_type = f64)]
    pub total_reward: Amount,
    pub details: Vec<RewardDetailResponse>,
}

impl From<&RewardOutcome> for RewardCalculationResponse {
    fn from(o: &RewardOutcome) -> Self {
        Self {
            total_reward: o.total_reward,
            details: o.details.iter().map(RewardDetailResponse::from).collect(),
        }
    }
}

/// Request body for `POST /api/v1/reward/simulate`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SimulateRewardRequest {
    #[schema(value_type = f64)]
    pub tax_excluded_fee: Amount,
    #[serde(default = "default_source")]
    pub source: String,
    /// YTD fee total before this deal. Defaults to 0.
    #[serde(default)]
    #[schema(value_type = f64)]
    pub current_annual_total: Amount,
}

/// Response for `POST /api/v1/reward/simulate`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SimulationResponse {
    #[schema(value_type = f64)]
    pub tax_excluded_fee: Amount,
    pub source: String,
    #[schema(value_type = f64)]
    pub reward: Amount,
    pub rate: f64,
    pub bonus_applied: bool,
    #[schema(value_type = f64)]
    pub annual_total: Amount,
    #[schema(value_type = f64)]
    pub new_annual_total: Amount,
    pub bonus_threshold_reached: bool,
}

impl From<&RewardSimulation> for SimulationResponse {
    fn from(s: &RewardSimulation) -> Self {
        Self {
            tax_excluded_fee: s.fee,
            source: s.source.to_string(),
            reward: s.reward,
            rate: s.rate.as_f64(),
            bonus_applied: s.bonus_applied,
            annual_total: s.annual_total,
            new_annual_total: s.new_annual_total,
            bonus_threshold_reached: s.bonus_threshold_reached,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/reward/calculate", post(calculate_reward))
        .route("/api/v1/reward/simulate", post(simulate))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reward/calculate
#[utoipa::path(
    post,
    path = "/api/v1/reward/calculate",
    request_body = CalculateRewardRequest,
    responses(
        (status = 200, description = "Rewards computed", body = RewardCalculationResponse),
        (status = 400, description = "Malformed body or invalid deal", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API token", body = crate::error::ErrorBody),
    ),
    tag = "reward"
)]
pub async fn calculate_reward(
    body: Result<Json<CalculateRewardRequest>, JsonRejection>,
) -> Result<Json<RewardCalculationResponse>, AppError> {
    let req = extract_json(body)?;
    let today = Local::now().date_naive();

    let deals = req
        .deals
        .into_iter()
        .map(|d| d.into_deal(today))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = calculate_rewards(&deals, req.year_to_date.unwrap_or(Amount::ZERO));
    tracing::debug!(
        deals = deals.len(),
        total_reward = %outcome.total_reward,
        "rewards calculated"
    );
    Ok(Json(RewardCalculationResponse::from(&outcome)))
}

/// POST /api/v1/reward/simulate
#[utoipa::path(
    post,
    path = "/api/v1/reward/simulate",
    request_body = SimulateRewardRequest,
    responses(
        (status = 200, description = "Simulation result", body = SimulationResponse),
        (status = 400, description = "Malformed body or invalid source", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API token", body = crate::error::ErrorBody),
    ),
    tag = "reward"
)]
pub async fn simulate(
    body: Result<Json<SimulateRewardRequest>, JsonRejection>,
) -> Result<Json<SimulationResponse>, AppError> {
    let req = extract_json(body)?;
    let source: DealSource = req.source.parse()?;
    let sim = simulate_reward(req.tax_excluded_fee, source, req.current_annual_total);
    Ok(Json(SimulationResponse::from(&sim)))
}
