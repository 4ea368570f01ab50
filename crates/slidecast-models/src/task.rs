//! Twelve Labs upload task models.
//!
//! Tasks are remote, asynchronous indexing jobs. They are polled, never
//! persisted locally.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of an indexing task as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// No status field in the payload.
    Unknown,
    /// Any non-terminal status (`pending`, `validating`, `indexing`, ...).
    Processing(String),
    Ready,
    Completed,
    Failed,
    Error,
}

impl TaskStatus {
    pub fn parse(status: Option<&str>) -> Self {
        match status {
            None => Self::Unknown,
            Some("ready") => Self::Ready,
            Some("completed") => Self::Completed,
            Some("failed") => Self::Failed,
            Some("error") => Self::Error,
            Some(other) => Self::Processing(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => "unknown",
            Self::Processing(s) => s,
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ready | Self::Completed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Error)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }
}

/// Snapshot of a polled task.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTask {
    pub task_id: String,
    pub status: TaskStatus,
    pub video_id: Option<String>,
    /// Raw task payload, returned to callers as-is.
    pub raw: Value,
}

/// Result of uploading and indexing a video file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadOutcome {
    Indexed {
        status: String,
        video_id: Option<String>,
        task: Value,
    },
    Failed {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task: Option<Value>,
    },
}

impl UploadOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            task: None,
        }
    }

    pub fn failed_with_task(error: impl Into<String>, task: Value) -> Self {
        Self::Failed {
            error: error.into(),
            task: Some(task),
        }
    }

    pub fn indexed(task: UploadTask) -> Self {
        Self::Indexed {
            status: task.status.as_str().to_string(),
            video_id: task.video_id,
            task: task.raw,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }
}
