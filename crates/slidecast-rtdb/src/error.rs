//! Realtime Database error types.

use thiserror::Error;

/// Result type for Realtime Database operations.
pub type RtdbResult<T> = Result<T, RtdbError>;

/// Errors that can occur during Realtime Database operations.
#[derive(Debug, Error)]
pub enum RtdbError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Access token expired: {0}")]
    TokenExpired(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Request URLs carry the `auth`/`access_token` query parameter and never
// appear in error text.
impl From<reqwest::Error> for RtdbError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

impl RtdbError {
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    /// Map an HTTP error status to an error.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            401 => Self::AuthError(msg),
            403 => Self::PermissionDenied(msg),
            429 => Self::RateLimited(1000),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(msg),
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RtdbError::Network(_)
                | RtdbError::RateLimited(_)
                | RtdbError::ServerError(..)
                | RtdbError::TokenExpired(_)
        )
    }

    /// HTTP status associated with the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RtdbError::AuthError(_) | RtdbError::TokenExpired(_) => Some(401),
            RtdbError::PermissionDenied(_) => Some(403),
            RtdbError::RateLimited(_) => Some(429),
            RtdbError::ServerError(status, _) => Some(*status),
            _ => None,
        }
    }

    /// Server-requested delay before retrying.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            RtdbError::RateLimited(ms) => Some(*ms),
            _ => None,
        }
    }
}
