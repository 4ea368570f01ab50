//! Index and video browsing handlers.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use slidecast_models::{Index, Video};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /indexes`. Provider failures yield an empty list.
pub async fn list_indexes(State(state): State<AppState>) -> Json<Vec<Index>> {
    Json(state.twelvelabs.list_indexes().await.into_items())
}

/// `GET /indexes/:index_id/videos`. Provider failures yield an empty list.
pub async fn list_videos(
    State(state): State<AppState>,
    Path(index_id): Path<String>,
) -> Json<Vec<Video>> {
    Json(state.twelvelabs.list_videos(&index_id).await.into_items())
}

/// `GET /indexes/:index_id/videos/:video_id`
pub async fn get_video_details(
    State(state): State<AppState>,
    Path((index_id, video_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    state
        .twelvelabs
        .get_video_details(&index_id, &video_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Video {} not found", video_id)))
}

/// `GET /indexes/:index_id/videos/:video_id/thumbnail`
pub async fn get_video_thumbnail(
    State(state): State<AppState>,
    Path((index_id, video_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let thumbnail = state
        .twelvelabs
        .get_video_thumbnail(&index_id, &video_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Thumbnail not available"))?;

    let content_type = thumbnail
        .content_type
        .unwrap_or_else(|| "image/jpeg".to_string());

    Ok(([(header::CONTENT_TYPE, content_type)], thumbnail.bytes).into_response())
}
