//! Relay configuration.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Relay configuration.
///
/// Custom `Debug` implementation redacts both secrets.
#[derive(Clone)]
pub struct RelayConfig {
    pub port: u16,
    /// Upstream bearer key. Requests fail with 500 while unset.
    pub api_key: Option<Zeroizing<String>>,
    /// Expected `X-MyAgent-Token`. Every request is refused while unset.
    pub app_token: Option<Zeroizing<String>>,
    pub upstream_url: Url,
    pub timeout: Duration,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("app_token", &self.app_token.as_ref().map(|_| "[REDACTED]"))
            .field("upstream_url", &self.upstream_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `OPENAI_API_KEY` (optional; requests fail until set)
    /// - `INTERNAL_APP_TOKEN` (optional; requests are refused until set)
    /// - `PORT` (default: 8080)
    /// - `RELAY_UPSTREAM_URL` (default: the OpenAI chat-completions endpoint)
    /// - `RELAY_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(Zeroizing::new)
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT".to_string(), raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let raw_url = lookup("RELAY_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let upstream_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("RELAY_UPSTREAM_URL".to_string(), e.to_string()))?;

        let timeout_secs = match lookup("RELAY_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("RELAY_TIMEOUT_SECS".to_string(), raw.clone()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            api_key: secret("OPENAI_API_KEY"),
            app_token: secret("INTERNAL_APP_TOKEN"),
            upstream_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    Invalid(String, String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
