//! Twelve Labs client error types.

use thiserror::Error;

pub type TwelveLabsResult<T> = Result<T, TwelveLabsError>;

#[derive(Debug, Error)]
pub enum TwelveLabsError {
    #[error("Missing TwelveLabs API key")]
    MissingApiKey,

    #[error("Failed to create upload task: {status} {body}")]
    TaskCreation { status: u16, body: String },

    #[error("No task id returned: {0}")]
    MissingTaskId(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TwelveLabsError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}
