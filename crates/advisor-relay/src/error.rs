//! Relay error responses: `{"error": "<message>"}` with a status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// Missing or wrong `X-MyAgent-Token`, or no token configured.
    #[error("Forbidden")]
    Forbidden,

    #[error("API key not configured")]
    MissingApiKey,

    /// Upstream unreachable, timed out, or the body could not be read.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Forbidden => tracing::warn!("relay request refused"),
            Self::MissingApiKey => tracing::error!("OPENAI_API_KEY is not configured"),
            Self::Upstream(e) => tracing::error!(error = %e, "upstream request failed"),
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(RelayError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            RelayError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(RelayError::Forbidden.to_string(), "Forbidden");
        assert_eq!(RelayError::MissingApiKey.to_string(), "API key not configured");
    }
}
