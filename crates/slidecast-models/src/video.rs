//! Video models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Twelve Labs video identifier, also the key for stored results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can be used as a Realtime Database key.
    ///
    /// Keys must be non-empty, at most 768 bytes, and free of `.`, `$`, `#`,
    /// `[`, `]`, `/` and control characters.
    pub fn is_valid_key(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= 768
            && !self
                .0
                .chars()
                .any(|c| matches!(c, '.' | '$' | '#' | '[' | ']' | '/') || c.is_control())
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Metadata for an indexed video, projected from the provider's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub fps: f64,
    #[serde(default)]
    pub size: u64,
}

impl Video {
    /// Display name used when the provider has no filename.
    pub fn fallback_name(id: &str) -> String {
        format!("Video {}", id)
    }
}
