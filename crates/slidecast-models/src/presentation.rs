//! Generated presentation models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slide count used when the caller does not ask for one.
pub const DEFAULT_SLIDE_COUNT: u32 = 5;

/// A generated slide deck, stored under `/presentations/{video_id}`.
///
/// Holds the object the model produced as-is. The expected keys are
/// `presentation_name` and `slides` (each with `slide_number`, `title` and
/// `sub_points`), but nothing is coerced or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Presentation(Map<String, Value>);

impl Presentation {
    pub fn new(object: Map<String, Value>) -> Self {
        Self(object)
    }

    /// `None` unless `value` is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(Self(object)),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("presentation_name").and_then(Value::as_str)
    }

    /// The `slides` array; empty when missing or not an array.
    pub fn slides(&self) -> &[Value] {
        self.0
            .get("slides")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Result of asking Gemini for a presentation.
///
/// Generation never raises; failures carry the raw model text so callers can
/// see what the model actually said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationOutcome {
    Failed { error: String, raw_response: String },
    Generated(Presentation),
}

impl GenerationOutcome {
    pub fn failed(error: impl Into<String>, raw_response: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            raw_response: raw_response.into(),
        }
    }

    pub fn presentation(&self) -> Option<&Presentation> {
        match self {
            Self::Generated(p) => Some(p),
            Self::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_outcome_shape() {
        let outcome = GenerationOutcome::failed("No JSON object found", "hello");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, json!({"error": "No JSON object found", "raw_response": "hello"}));
    }

    #[test]
    fn test_generated_outcome_is_plain_presentation() {
        let deck = json!({
            "presentation_name": "Deck",
            "slides": [{"slide_number": 1, "title": "Intro", "sub_points": ["a"]}]
        });
        let outcome = GenerationOutcome::Generated(Presentation::from_value(deck.clone()).unwrap());
        assert_eq!(serde_json::to_value(&outcome).unwrap(), deck);
    }

    #[test]
    fn test_presentation_keeps_unexpected_fields() {
        let deck = json!({
            "presentation_name": "Deck",
            "theme": "dark",
            "slides": [{"slide_number": 1.0, "title": "Intro", "speaker_notes": "n"}]
        });
        let presentation: Presentation = serde_json::from_value(deck.clone()).unwrap();

        assert_eq!(presentation.name(), Some("Deck"));
        assert_eq!(presentation.slides().len(), 1);
        assert_eq!(presentation.slides()[0]["speaker_notes"], "n");
        assert_eq!(serde_json::to_value(&presentation).unwrap(), deck);
    }

    #[test]
    fn test_presentation_requires_object() {
        assert!(Presentation::from_value(json!("deck")).is_none());
        assert!(serde_json::from_value::<Presentation>(json!([1, 2])).is_err());
        assert!(Presentation::from_value(json!({})).unwrap().slides().is_empty());
    }

    #[test]
    fn test_failed_outcome_round_trips() {
        let json = json!({"error": "No JSON object found", "raw_response": "hello"});
        let outcome: GenerationOutcome = serde_json::from_value(json).unwrap();
        assert!(outcome.presentation().is_none());
    }
}
