//! Error types for the backend API client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the NeuroLine backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("unexpected status {status} from {endpoint}")]
    Status {
        /// Status code returned.
        status: StatusCode,
        /// Endpoint path that produced it.
        endpoint: String,
    },

    /// Response body could not be decoded.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL or endpoint path is invalid.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Malformed payload on the chat event stream.
    #[error("stream protocol error: {0}")]
    Stream(String),

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether this error is a 404 from the backend.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        )
    }
}

/// Convenience result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
