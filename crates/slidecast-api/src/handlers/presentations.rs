//! Presentation generation and retrieval handlers.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use slidecast_models::{GenerationOutcome, Presentation, DEFAULT_SLIDE_COUNT};

use crate::error::{ApiError, ApiResult};
use crate::handlers::checked_video_id;
use crate::metrics;
use crate::services::gemini::presentation_instruction;
use crate::state::AppState;

/// Optional body of `POST /videos/:video_id/presentation`.
#[derive(Debug, Deserialize, Validate)]
pub struct PresentationRequest {
    #[serde(default = "default_num_slides")]
    #[validate(range(min = 1, max = 50))]
    pub num_slides: u32,
}

fn default_num_slides() -> u32 {
    DEFAULT_SLIDE_COUNT
}

impl Default for PresentationRequest {
    fn default() -> Self {
        Self {
            num_slides: DEFAULT_SLIDE_COUNT,
        }
    }
}

impl PresentationRequest {
    /// Parse a request body.
    ///
    /// An empty, non-JSON or `null` body means defaults. JSON that is present
    /// but has the wrong shape or an out-of-range slide count is rejected.
    pub fn from_body(body: &[u8]) -> ApiResult<Self> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(Value::Null) | Err(_) => return Ok(Self::default()),
            Ok(value) => value,
        };

        let request: Self = serde_json::from_value(value)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;
        request.validate()?;
        Ok(request)
    }
}

const ANALYSIS_DATA_MISSING: &str = "Video analysis data not found in the Firebase record.";

/// `POST /videos/:video_id/presentation`
///
/// Requires a readable stored analysis (404 otherwise). Generation failures are returned
/// with status 200 as `{error, raw_response}` and are not stored.
pub async fn generate_presentation(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<GenerationOutcome>> {
    let video_id = checked_video_id(video_id)?;
    let request = PresentationRequest::from_body(&body)?;

    let analysis = match state.store.get_analysis(&video_id).await {
        Ok(Some(analysis)) => analysis,
        Ok(None) => {
            return Err(ApiError::not_found(
                "Video analysis not found. Please analyze the video first.",
            ))
        }
        Err(e) => {
            warn!(video_id = %video_id, "Failed to read analysis: {}", e);
            return Err(ApiError::not_found(ANALYSIS_DATA_MISSING));
        }
    };

    if analysis.is_empty() {
        return Err(ApiError::not_found(ANALYSIS_DATA_MISSING));
    }

    let instruction = presentation_instruction(request.num_slides);
    let outcome = state.gemini.generate_slides(&analysis, &instruction).await;

    match outcome.presentation() {
        Some(presentation) => {
            if let Err(e) = state.store.save_presentation(&video_id, presentation).await {
                warn!(video_id = %video_id, "Failed to store presentation: {}", e);
            }
            metrics::record_presentation("generated");
            info!(
                video_id = %video_id,
                slides = presentation.slides().len(),
                "Presentation generated"
            );
        }
        None => {
            metrics::record_presentation("failed");
            warn!(video_id = %video_id, "Presentation generation failed");
        }
    }

    Ok(Json(outcome))
}

/// `GET /videos/:video_id/presentation`
pub async fn get_presentation(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<Presentation>> {
    let video_id = checked_video_id(video_id)?;

    state
        .store
        .get_presentation(&video_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Presentation not found"))
}

/// `GET /presentations`. Store failures yield an empty object.
pub async fn list_presentations(State(state): State<AppState>) -> Json<BTreeMap<String, Presentation>> {
    match state.store.list_presentations().await {
        Ok(presentations) => Json(presentations),
        Err(e) => {
            warn!("Failed to list presentations: {}", e);
            Json(BTreeMap::new())
        }
    }
}
