//! Video analysis handlers.

use axum::extract::{Path, State};
use axum::Json;
use tracing::{info, warn};

use slidecast_models::VideoAnalysis;

use crate::error::{ApiError, ApiResult};
use crate::handlers::checked_video_id;
use crate::metrics;
use crate::state::AppState;

/// `POST /videos/:video_id/analyze`
///
/// Analyzes the video with Twelve Labs and stores the result, replacing any
/// earlier analysis. Provider failures are a 500. A failed store write is
/// logged and the analysis is still returned.
pub async fn analyze_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<VideoAnalysis>> {
    let video_id = checked_video_id(video_id)?;

    let data = match state.twelvelabs.analyze_video(video_id.as_str()).await {
        Ok(data) => data,
        Err(e) => {
            metrics::record_analysis("failed");
            return Err(e.into());
        }
    };

    let analysis = VideoAnalysis::new(data);
    if let Err(e) = state.store.save_analysis(&video_id, &analysis).await {
        warn!(video_id = %video_id, "Failed to store analysis: {}", e);
    }

    metrics::record_analysis("stored");
    info!(video_id = %video_id, "Video analyzed");
    Ok(Json(analysis))
}

/// `GET /videos/:video_id/analysis`
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<VideoAnalysis>> {
    let video_id = checked_video_id(video_id)?;

    state
        .store
        .get_analysis(&video_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Video analysis not found. Please analyze the video first."))
}
