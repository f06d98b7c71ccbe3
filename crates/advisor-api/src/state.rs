//! # Application State & Configuration

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::feedback::FeedbackStore;

/// Token used when `API_TOKEN` is unset. Development only.
pub const DEV_API_TOKEN: &str = "advisor-dev-token";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FEEDBACK_FILE: &str = "feedback_data.json";

/// Errors reading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a valid port")]
    InvalidPort { var: &'static str, value: String },
}

/// Server configuration.
///
/// Custom `Debug` redacts the token.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Expected `X-API-Token` value. `None` disables authentication.
    pub auth_token: Option<Zeroizing<String>>,
    pub feedback_file: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("feedback_file", &self.feedback_file)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: None,
            feedback_file: PathBuf::from(DEFAULT_FEEDBACK_FILE),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Variables:
    /// - `API_TOKEN` (default: [`DEV_API_TOKEN`], with a warning)
    /// - `API_PORT` (default: 5000)
    /// - `FEEDBACK_FILE` (default: `feedback_data.json`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let auth_token = match lookup("API_TOKEN").filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                tracing::warn!(
                    "API_TOKEN not set; using the development default token. Set API_TOKEN in production."
                );
                DEV_API_TOKEN.to_string()
            }
        };

        let port = match lookup("API_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: "API_PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let feedback_file = lookup("FEEDBACK_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FEEDBACK_FILE));

        Ok(Self {
            port,
            auth_token: Some(Zeroizing::new(auth_token)),
            feedback_file,
        })
    }
}

/// Shared application state, cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub feedback: Arc<FeedbackStore>,
}

impl AppState {
    pub fn with_config(config: AppConfig) -> Self {
        let feedback = Arc::new(FeedbackStore::new(config.feedback_file.clone()));
        Self { config, feedback }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(AppConfig::default())
    }
}
