//! End-to-end relay tests against a wiremock upstream.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeroize::Zeroizing;

use advisor_relay::{app, RelayConfig, RelayState};

const APP_TOKEN: &str = "app-token";
const API_KEY: &str = "sk-test";

fn config(mock_server: &MockServer, api_key: Option<&str>) -> RelayConfig {
    RelayConfig {
        port: 0,
        api_key: api_key.map(|k| Zeroizing::new(k.to_string())),
        app_token: Some(Zeroizing::new(APP_TOKEN.to_string())),
        upstream_url: format!("{}/v1/chat/completions", mock_server.uri())
            .parse()
            .unwrap(),
        timeout: Duration::from_secs(5),
    }
}

fn relay(config: RelayConfig) -> axum::Router {
    app(RelayState::new(config).unwrap())
}

fn chat_request(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/openai/chat")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("X-MyAgent-Token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

fn chat_body() -> Value {
    json!({
        "model": "gpt-4o-mini",
        "messages": [{"role": "user", "content": "How is my bonus stage computed?"}]
    })
}

#[tokio::test]
async fn forwards_body_with_bearer_and_returns_upstream_response() {
    let mock_server = MockServer::start().await;
    let upstream_reply = json!({"choices": [{"message": {"content": "It unlocks at 20M."}}]});

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("content-type", "application/json"))
        .and(body_json(chat_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_reply.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = relay(config(&mock_server, Some(API_KEY)))
        .oneshot(chat_request(Some(APP_TOKEN), &chat_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, upstream_reply);
}

#[tokio::test]
async fn upstream_error_status_and_body_pass_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_raw("slow down", "text/plain"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = relay(config(&mock_server, Some(API_KEY)))
        .oneshot(chat_request(Some(APP_TOKEN), &chat_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/plain"
    );
    assert_eq!(body_bytes(response).await, b"slow down");
}

#[tokio::test]
async fn missing_or_wrong_token_is_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    for token in [None, Some("wrong"), Some("")] {
        let response = relay(config(&mock_server, Some(API_KEY)))
            .oneshot(chat_request(token, &chat_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body, json!({"error": "Forbidden"}));
    }
}

#[tokio::test]
async fn missing_api_key_is_500() {
    let mock_server = MockServer::start().await;

    let response = relay(config(&mock_server, None))
        .oneshot(chat_request(Some(APP_TOKEN), &chat_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({"error": "API key not configured"}));
}

#[tokio::test]
async fn unreachable_upstream_is_502() {
    let mut cfg = RelayConfig::from_lookup(|_| None).unwrap();
    cfg.api_key = Some(Zeroizing::new(API_KEY.to_string()));
    cfg.app_token = Some(Zeroizing::new(APP_TOKEN.to_string()));
    cfg.upstream_url = "http://127.0.0.1:9/v1/chat/completions".parse().unwrap();
    cfg.timeout = Duration::from_secs(2);

    let response = relay(cfg)
        .oneshot(chat_request(Some(APP_TOKEN), &chat_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("upstream request failed"));
}

#[tokio::test]
async fn health_needs_no_token() {
    let mock_server = MockServer::start().await;
    let response = relay(config(&mock_server, None))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
