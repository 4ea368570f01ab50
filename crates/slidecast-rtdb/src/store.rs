//! Per-video result store.
//!
//! Layout:
//! - `/video_analysis/{video_id}` → `VideoAnalysis`
//! - `/presentations/{video_id}` → `Presentation`
//!
//! Writes overwrite; there is no versioning.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, warn};

use slidecast_models::{Presentation, VideoAnalysis, VideoId};

use crate::client::RealtimeDbClient;
use crate::error::{RtdbError, RtdbResult};

/// Root node for stored analyses.
pub const ANALYSIS_ROOT: &str = "video_analysis";

/// Root node for stored presentations.
pub const PRESENTATIONS_ROOT: &str = "presentations";

/// Store for analyses and presentations keyed by video id.
#[derive(Clone)]
pub struct ResultStore {
    db: RealtimeDbClient,
}

impl ResultStore {
    pub fn new(db: RealtimeDbClient) -> Self {
        Self { db }
    }

    fn node(root: &str, video_id: &VideoId) -> RtdbResult<String> {
        if !video_id.is_valid_key() {
            return Err(RtdbError::InvalidKey(video_id.to_string()));
        }
        Ok(format!("{}/{}", root, video_id))
    }

    pub async fn save_analysis(&self, video_id: &VideoId, analysis: &VideoAnalysis) -> RtdbResult<()> {
        let path = Self::node(ANALYSIS_ROOT, video_id)?;
        self.db.set(&path, analysis).await?;
        info!(video_id = %video_id, "Saved video analysis");
        Ok(())
    }

    pub async fn get_analysis(&self, video_id: &VideoId) -> RtdbResult<Option<VideoAnalysis>> {
        let path = Self::node(ANALYSIS_ROOT, video_id)?;
        self.db.get(&path).await
    }

    pub async fn save_presentation(&self, video_id: &VideoId, presentation: &Presentation) -> RtdbResult<()> {
        let path = Self::node(PRESENTATIONS_ROOT, video_id)?;
        self.db.set(&path, presentation).await?;
        info!(
            video_id = %video_id,
            slides = presentation.slides().len(),
            "Saved presentation"
        );
        Ok(())
    }

    pub async fn get_presentation(&self, video_id: &VideoId) -> RtdbResult<Option<Presentation>> {
        let path = Self::node(PRESENTATIONS_ROOT, video_id)?;
        self.db.get(&path).await
    }

    /// All stored presentations keyed by video id.
    ///
    /// Entries that do not parse as a presentation are skipped with a warning
    /// rather than failing the whole listing.
    pub async fn list_presentations(&self) -> RtdbResult<BTreeMap<String, Presentation>> {
        let raw: Option<BTreeMap<String, Value>> = self.db.get(PRESENTATIONS_ROOT).await?;

        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(video_id, value)| match serde_json::from_value(value) {
                Ok(presentation) => Some((video_id, presentation)),
                Err(e) => {
                    warn!(video_id = %video_id, "Skipping malformed stored presentation: {}", e);
                    None
                }
            })
            .collect())
    }
}
