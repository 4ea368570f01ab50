//! Stored video analysis.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Analysis produced by Twelve Labs for one video.
///
/// The payload is whatever the provider returned (usually free text) and is
/// kept opaque. Stored under `/video_analysis/{video_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    #[serde(default)]
    pub analysis: Value,
}

impl VideoAnalysis {
    pub fn new(analysis: Value) -> Self {
        Self { analysis }
    }

    /// True when the record holds no usable analysis (missing, null or empty).
    pub fn is_empty(&self) -> bool {
        match &self.analysis {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Object(m) => m.is_empty(),
            Value::Array(a) => a.is_empty(),
            _ => false,
        }
    }

    /// Render the analysis for inclusion in a prompt.
    pub fn as_prompt_text(&self) -> String {
        match &self.analysis {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_analysis_field_is_empty() {
        let analysis: VideoAnalysis = serde_json::from_value(json!({"other": 1})).unwrap();
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_prompt_text_uses_raw_string() {
        let analysis = VideoAnalysis::new(json!("A talk about Rust."));
        assert_eq!(analysis.as_prompt_text(), "A talk about Rust.");
        assert!(!analysis.is_empty());
    }

    #[test]
    fn test_prompt_text_structured() {
        let analysis = VideoAnalysis::new(json!({"theme": "ownership"}));
        assert!(analysis.as_prompt_text().contains("\"theme\": \"ownership\""));
    }
}
