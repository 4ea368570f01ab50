//! Video upload handler.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use slidecast_models::UploadOutcome;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::sanitize_filename;
use crate::state::AppState;

/// A received file on local disk, removed when dropped.
struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    /// Stream a multipart field to a fresh file under `dir`.
    async fn save(dir: &Path, mut field: Field<'_>) -> ApiResult<Self> {
        let name = sanitize_filename(field.file_name().unwrap_or_default());

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create upload directory: {}", e)))?;

        let staged = Self {
            path: dir.join(format!("{}_{}", Uuid::new_v4(), name)),
        };

        let mut file = tokio::fs::File::create(&staged.path)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to save upload: {}", e)))?;

        let mut written: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to save upload: {}", e)))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| ApiError::internal(format!("Failed to save upload: {}", e)))?;

        debug!(path = %staged.path.display(), bytes = written, "Upload staged");
        Ok(staged)
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), "Failed to remove staged upload: {}", e);
            }
        }
    }
}

/// `POST /upload`
///
/// Multipart with a `video` file and an `index_id` text field. Missing inputs
/// are a 400; provider failures come back with status 200 as `{error}`. The
/// request is held until indexing finishes or the upload timeout passes.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadOutcome>> {
    let mut multipart = multipart.map_err(|_| ApiError::bad_request("No video file provided"))?;

    let mut video: Option<StagedUpload> = None;
    let mut index_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("video") if video.is_none() => {
                video = Some(StagedUpload::save(&state.config.upload_dir, field).await?);
            }
            Some("index_id") => {
                index_id = Some(field.text().await?.trim().to_string());
            }
            _ => {}
        }
    }

    let video = video.ok_or_else(|| ApiError::bad_request("No video file provided"))?;
    let index_id = index_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Index ID is required"))?;

    info!(index_id = %index_id, "Uploading video to Twelve Labs");
    let outcome = state
        .twelvelabs
        .upload_and_index(&index_id, &video.path, state.config.upload_timeout)
        .await;
    drop(video);

    metrics::record_upload(if outcome.is_indexed() { "indexed" } else { "failed" });
    Ok(Json(outcome))
}
