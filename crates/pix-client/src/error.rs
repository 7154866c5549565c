//! PIX session error types.

use pix_core::PixError;

/// Errors from PIX API calls.
#[derive(Debug, thiserror::Error)]
pub enum PixApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The endpoint returned a non-2xx status.
    #[error("PIX API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not valid JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The request path could not be joined onto the base URL.
    #[error("invalid request path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
    /// A registered behavior rejected data in the response.
    #[error("failed to promote response from {endpoint}: {source}")]
    Objectify {
        endpoint: String,
        source: PixError,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
