//! # Integration Tests for advisor-api
//!
//! Drives the assembled router end to end: unauthenticated info routes,
//! token enforcement, reward and classification endpoints, the feedback
//! file round trip, and the OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use zeroize::Zeroizing;

use advisor_api::state::{AppConfig, AppState};

const TOKEN: &str = "test-token";

/// Test app with auth enabled and a feedback file in a fresh temp dir.
fn test_app() -> (axum::Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        port: 0,
        auth_token: Some(Zeroizing::new(TOKEN.to_string())),
        feedback_file: dir.path().join("feedback.json"),
    };
    (advisor_api::app(AppState::with_config(config)), dir)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("X-API-Token", TOKEN)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_authed(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-API-Token", TOKEN)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// -- Info & health ------------------------------------------------------------

#[tokio::test]
async fn test_index_is_public() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Commission Advisor API");
    assert_eq!(body["endpoints"]["reward_calculation"], "/api/v1/reward/calculate");
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/v1/reward/calculate"].is_object());
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_reward_requires_token() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/reward/calculate")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"deals": []}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/feedback")
                .header("X-API-Token", "nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// -- Reward -------------------------------------------------------------------

#[tokio::test]
async fn test_calculate_two_self_deals() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/v1/reward/calculate",
            json!({
                "deals": [
                    {"tax_excluded_fee": 15_000_000, "source": "self", "date": "2025-04-01"},
                    {"tax_excluded_fee": 10_000_000, "source": "self_discovered", "date": "2025-05-01"}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_reward"], 18_750_000);
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["reward_amount"], 11_250_000);
    assert_eq!(details[0]["rate_applied"], 0.75);
    assert_eq!(details[0]["deal"]["source"], "self_discovered");
    assert_eq!(details[0]["deal"]["date"], "2025-04-01");
    assert_eq!(details[1]["bonus_activated"], false);
    assert_eq!(details[1]["year_to_date_after"], 25_000_000);
}

#[tokio::test]
async fn test_calculate_with_year_to_date_triggers_bonus() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/v1/reward/calculate",
            json!({
                "deals": [{"tax_excluded_fee": 1_000_000}],
                "year_to_date": 20_000_000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["details"][0]["bonus_activated"], true);
    assert_eq!(body["details"][0]["rate_applied"], 0.9);
    assert_eq!(body["total_reward"], 900_000);
}

#[tokio::test]
async fn test_calculate_missing_deals_is_400() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json("/api/v1/reward/calculate", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_calculate_unknown_source_is_400() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/v1/reward/calculate",
            json!({"deals": [{"tax_excluded_fee": 1000, "source": "gift"}]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("gift"));
}

#[tokio::test]
async fn test_calculate_negative_fee_is_400() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/v1/reward/calculate",
            json!({"deals": [{"tax_excluded_fee": -1}]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_simulate() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/v1/reward/simulate",
            json!({
                "tax_excluded_fee": 5_000_000,
                "source": "partner_offer",
                "current_annual_total": 18_000_000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["tax_excluded_fee"], 5_000_000);
    assert_eq!(body["reward"], 2_750_000);
    assert_eq!(body["rate"], 0.55);
    assert_eq!(body["bonus_applied"], false);
    assert_eq!(body["new_annual_total"], 23_000_000);
    assert_eq!(body["bonus_threshold_reached"], true);
}

// -- Agent class --------------------------------------------------------------

#[tokio::test]
async fn test_agent_class_capital_senior() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/v1/agent/class",
            json!({"region": "capital", "period_sales": 12_000_000, "cumulative_cases": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["class"], "Senior");
    assert_eq!(body["next_class"], "Premier");
    assert_eq!(body["gap"]["sales_gap"], 18_000_000);
}

#[tokio::test]
async fn test_agent_class_defaults_to_unranked_capital() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json("/api/v1/agent/class", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["class"], "Unranked");
    assert_eq!(body["next_class"], "Lead");
    assert_eq!(body["gap"]["target_sales"], 5_000_000);
    assert!(body.get("period").is_none());
}

#[tokio::test]
async fn test_agent_class_top_tier_message() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/v1/agent/class",
            json!({"region": "local", "period_sales": 26_000_000, "cumulative_cases": 12}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["class"], "Premier");
    assert_eq!(body["message"], "top tier reached");
    assert!(body["gap"].is_null());
}

#[tokio::test]
async fn test_agent_class_unknown_region_is_400() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json("/api/v1/agent/class", json!({"region": "moon"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Feedback -----------------------------------------------------------------

#[tokio::test]
async fn test_feedback_round_trip() {
    let (app, dir) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/feedback",
            json!({"message": "Please add more loan options", "category": "feature_request"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let id = body["feedback_id"].as_str().unwrap().to_string();
    assert!(id.starts_with("fb_"));
    assert!(dir.path().join("feedback.json").exists());

    let response = app
        .oneshot(get_authed("/api/v1/feedback?status=pending"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    let entry = &body["feedback"][0];
    assert_eq!(entry["id"], id.as_str());
    assert_eq!(entry["user_id"], "anonymous");
    assert_eq!(entry["category"], "feature_request");
    assert_eq!(entry["status"], "pending");
    assert_eq!(entry["context"], json!({}));
}

#[tokio::test]
async fn test_feedback_limit_zero_returns_none() {
    let (app, _dir) = test_app();
    app.clone()
        .oneshot(post_json("/api/v1/feedback", json!({"message": "hi"})))
        .await
        .unwrap();

    let response = app
        .oneshot(get_authed("/api/v1/feedback?limit=0"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_feedback_missing_message_is_400() {
    let (app, _dir) = test_app();
    let response = app
        .oneshot(post_json("/api/v1/feedback", json!({"user_id": "agent1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_bad_query_is_400() {
    let (app, _dir) = test_app();
    let response = app
        .clone()
        .oneshot(get_authed("/api/v1/feedback?limit=lots"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get_authed("/api/v1/feedback?status=archived"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_corrupt_feedback_file_is_500_and_untouched() {
    let (app, dir) = test_app();
    let path = dir.path().join("feedback.json");
    std::fs::write(&path, "not json").unwrap();

    let response = app
        .oneshot(post_json("/api/v1/feedback", json!({"message": "hi"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
}
