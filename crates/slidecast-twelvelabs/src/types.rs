//! Twelve Labs request/response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use slidecast_models::{Index, Video};

/// Paginated list envelope (`{"data": [...], "page_info": {...}}`).
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct RawIndex {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub index_name: String,
}

impl From<RawIndex> for Index {
    fn from(raw: RawIndex) -> Self {
        Index::new(raw.id, raw.index_name)
    }
}

/// Numeric fields are read as floats; the API is not consistent about
/// integer vs. float encoding.
#[derive(Debug, Default, Deserialize)]
pub struct SystemMetadata {
    pub filename: Option<String>,
    pub duration: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fps: Option<f64>,
    pub size: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Hls {
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_urls: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RawVideo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub system_metadata: Option<SystemMetadata>,
    #[serde(default)]
    pub hls: Option<Hls>,
}

impl From<RawVideo> for Video {
    fn from(raw: RawVideo) -> Self {
        let meta = raw.system_metadata.unwrap_or_default();
        let hls = raw.hls.unwrap_or_default();

        Video {
            name: meta
                .filename
                .unwrap_or_else(|| Video::fallback_name(&raw.id)),
            duration: meta.duration.unwrap_or(0.0),
            thumbnail_url: hls.thumbnail_urls.and_then(|urls| urls.into_iter().next()),
            video_url: hls.video_url,
            width: meta.width.unwrap_or(0.0) as u32,
            height: meta.height.unwrap_or(0.0) as u32,
            fps: meta.fps.unwrap_or(0.0),
            size: meta.size.unwrap_or(0.0) as u64,
            id: raw.id,
        }
    }
}

/// Request body for `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub video_id: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Non-streaming `/analyze` response. Only `data` is kept.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub data: Value,
}

/// Response of the thumbnail endpoint.
#[derive(Debug, Deserialize)]
pub struct ThumbnailResponse {
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_projection() {
        let raw: RawVideo = serde_json::from_value(json!({
            "_id": "v1",
            "system_metadata": {
                "filename": "talk.mp4",
                "duration": 61.5,
                "width": 1920,
                "height": 1080,
                "fps": 29.97,
                "size": 1048576
            },
            "hls": {
                "video_url": "https://cdn.example/v1.m3u8",
                "thumbnail_urls": ["https://cdn.example/v1.jpg", "https://cdn.example/v1b.jpg"]
            }
        }))
        .unwrap();

        let video = Video::from(raw);
        assert_eq!(video.name, "talk.mp4");
        assert_eq!(video.width, 1920);
        assert_eq!(video.size, 1_048_576);
        assert_eq!(video.thumbnail_url.as_deref(), Some("https://cdn.example/v1.jpg"));
        assert_eq!(video.video_url.as_deref(), Some("https://cdn.example/v1.m3u8"));
    }

    #[test]
    fn test_video_projection_defaults() {
        let raw: RawVideo = serde_json::from_value(json!({"_id": "v2", "hls": null})).unwrap();
        let video = Video::from(raw);
        assert_eq!(video.name, "Video v2");
        assert_eq!(video.duration, 0.0);
        assert_eq!(video.fps, 0.0);
        assert!(video.thumbnail_url.is_none());
        assert!(video.video_url.is_none());
    }

    #[test]
    fn test_empty_thumbnail_list() {
        let raw: RawVideo =
            serde_json::from_value(json!({"_id": "v3", "hls": {"thumbnail_urls": []}})).unwrap();
        assert!(Video::from(raw).thumbnail_url.is_none());
    }

    #[test]
    fn test_index_projection() {
        let list: ListResponse<RawIndex> = serde_json::from_value(json!({
            "data": [{"_id": "i1", "index_name": "Lectures"}],
            "page_info": {"page": 1}
        }))
        .unwrap();
        let indexes: Vec<Index> = list.data.into_iter().map(Index::from).collect();
        assert_eq!(indexes, vec![Index::new("i1", "Lectures")]);
    }
}
