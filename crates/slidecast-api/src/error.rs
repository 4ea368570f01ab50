//! API error types.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use slidecast_rtdb::RtdbError;
use slidecast_twelvelabs::TwelveLabsError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP callers as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    TwelveLabs(#[from] TwelveLabsError),

    #[error("{0}")]
    Store(#[from] RtdbError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(RtdbError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::TwelveLabs(_) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge(format!("Upload too large: {}", e.body_text()));
        }
        Self::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, "Request failed: {}", self);
        }

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(TwelveLabsError::MissingApiKey).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(RtdbError::InvalidKey("a/b".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(RtdbError::ServerError(503, "down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_is_not_prefixed() {
        let err = ApiError::not_found("Video analysis not found. Please analyze the video first.");
        assert_eq!(err.to_string(), "Video analysis not found. Please analyze the video first.");
        assert_eq!(
            ApiError::from(TwelveLabsError::MissingApiKey).to_string(),
            "Missing TwelveLabs API key"
        );
    }

    #[tokio::test]
    async fn test_oversized_multipart_is_payload_too_large() {
        use axum::body::Body;
        use axum::extract::{DefaultBodyLimit, Multipart};
        use axum::http::Request;
        use axum::routing::post;
        use axum::Router;
        use tower::ServiceExt;

        async fn drain(mut multipart: Multipart) -> ApiResult<()> {
            while let Some(field) = multipart.next_field().await? {
                field.bytes().await?;
            }
            Ok(())
        }

        let app = Router::new()
            .route("/", post(drain))
            .layer(DefaultBodyLimit::max(64));

        let body = format!(
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"video\"; filename=\"a.mp4\"\r\n\r\n{}\r\n--XBOUNDARY--\r\n",
            "x".repeat(4096)
        );
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
