//! PIX session configuration.
//!
//! Read from the environment by default. Tests build it explicitly or via
//! [`PixConfig::local_mock`].

use std::time::Duration;

use url::Url;

use crate::retry::{RetryPolicy, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_RETRIES};

/// Default PIX endpoint when `PIX_URL` is unset.
pub const DEFAULT_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to a PIX endpoint.
///
/// `Debug` redacts `api_token`.
#[derive(Clone)]
pub struct PixConfig {
    /// Base URL; request paths are resolved against it.
    pub base_url: Url,
    /// Bearer token for API authentication.
    pub api_token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for transport failures and `429`/`5xx` answers.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for PixConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

impl PixConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PIX_URL` (default: `http://localhost:8080`)
    /// - `PIX_API_TOKEN` (required)
    /// - `PIX_TIMEOUT_SECS` (default: 30)
    /// - `PIX_MAX_RETRIES` (default: 3)
    /// - `PIX_RETRY_DELAY_MS` (default: 200)
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("PIX_API_TOKEN").map_err(|_| ConfigError::MissingToken)?;
        Ok(Self {
            base_url: env_url("PIX_URL", DEFAULT_URL)?,
            api_token,
            timeout_secs: env_number("PIX_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy {
                max_retries: env_number("PIX_MAX_RETRIES", DEFAULT_MAX_RETRIES),
                base_delay: Duration::from_millis(env_number(
                    "PIX_RETRY_DELAY_MS",
                    DEFAULT_BASE_DELAY_MS,
                )),
            },
        })
    }

    /// Configuration pointing at a local mock server.
    pub fn local_mock(port: u16, token: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            api_token: token.to_string(),
            timeout_secs: 5,
            retry: RetryPolicy::NEVER,
        })
    }
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PIX_API_TOKEN environment variable is required")]
    MissingToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API token is not a valid HTTP header value")]
    InvalidToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = PixConfig::local_mock(9100, "test-token").unwrap();
        assert_eq!(cfg.api_token, "test-token");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.retry, RetryPolicy::NEVER);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9100/");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = PixConfig::local_mock(9100, "secret-token").unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("PIX_NONEXISTENT_VAR_31337", "https://pix.example.com").unwrap();
        assert_eq!(url.as_str(), "https://pix.example.com/");
    }

    #[test]
    fn env_number_parses_or_defaults() {
        std::env::set_var("PIX_TEST_RETRIES", "7");
        std::env::set_var("PIX_TEST_RETRIES_BAD", "seven");
        assert_eq!(env_number("PIX_TEST_RETRIES", 3u32), 7);
        assert_eq!(env_number("PIX_TEST_RETRIES_BAD", 3u32), 3);
        assert_eq!(env_number("PIX_NONEXISTENT_VAR_31337", 200u64), 200);
        std::env::remove_var("PIX_TEST_RETRIES");
        std::env::remove_var("PIX_TEST_RETRIES_BAD");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("PIX_TEST_BAD_URL", "not a url");
        let result = env_url("PIX_TEST_BAD_URL", "https://pix.example.com");
        std::env::remove_var("PIX_TEST_BAD_URL");
        assert!(matches!(result, Err(ConfigError::InvalidUrl(var, _)) if var == "PIX_TEST_BAD_URL"));
    }
}
