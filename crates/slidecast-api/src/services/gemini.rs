//! Gemini client for turning a video analysis into a slide deck.
//!
//! The model is asked for a single JSON object. Replies are free text, so the
//! object is located between the first `{` and the last `}` before decoding.
//! Generation never returns an error: every failure becomes a
//! [`GenerationOutcome::Failed`] carrying the raw reply for diagnosis.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use slidecast_models::{GenerationOutcome, HealthStatus, Presentation, VideoAnalysis};

/// Gemini client errors. Only used internally; callers see outcomes.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Missing Gemini API key")]
    MissingApiKey,

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No content in Gemini response")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(reqwest::Error),
}

// Errors never carry the request URL.
impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

pub type GeminiResult<T> = Result<T, GeminiError>;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Role and task rules placed before the analysis.
const PROMPT_PREAMBLE: &str = "You are a Presentation Generator AI.

You receive two inputs:
1. **Video Analysis** -> This contains extracted keyframes, transcript, object detection, and summarization of the video.
2. **User Query** -> What kind of presentation the user wants (topic, focus, and number of slides).

### Task:
- Use the information from the Video Analysis and the User Query.
- Generate a clear, concise, and meaningful presentation.
- Each slide must be well-structured and relevant to the video.
- Ensure the number of slides matches the user query.
- Output must strictly follow the JSON format below, without extra explanation.

---

### Input:
";

/// Output schema placed after the user query.
const PROMPT_OUTPUT_FORMAT: &str = r#"### Output JSON Format:
{
  "presentation_name": "Meaningful Presentation Title",
  "slides": [
    {
      "slide_number": 1,
      "title": "Slide 1 Title",
      "sub_points": [
        "Bullet point A",
        "Bullet point B",
        "Bullet point C"
      ]
    },
    {
      "slide_number": 2,
      "title": "Slide 2 Title",
      "sub_points": [
        "Bullet point A",
        "Bullet point B"
      ]
    }
  ]
}
"#;

/// Build the full generation prompt.
pub fn build_presentation_prompt(analysis: &VideoAnalysis, user_query: &str) -> String {
    format!(
        "{}Video Analysis:\n{}\n\nUser Query:\n{}\n\n---\n\n{}",
        PROMPT_PREAMBLE,
        analysis.as_prompt_text(),
        user_query,
        PROMPT_OUTPUT_FORMAT
    )
}

/// The instruction sent as the user query for a deck of `num_slides` slides.
pub fn presentation_instruction(num_slides: u32) -> String {
    format!(
        "Generate a presentation from the provided video analysis. The presentation should have a title and {} slides with bullet points.",
        num_slides
    )
}

/// Slice from the first `{` to the last `}` inclusive.
///
/// `None` when either brace is missing or they appear in the wrong order.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Decode a free-text model reply into a presentation.
///
/// Only malformed JSON is rejected; the decoded object is kept whole.
pub fn parse_presentation_reply(text: &str) -> GenerationOutcome {
    let Some(json_text) = extract_json_object(text) else {
        return GenerationOutcome::failed("No JSON object found in Gemini response", text);
    };

    let value: Value = match serde_json::from_str(json_text) {
        Ok(value) => value,
        Err(e) => {
            return GenerationOutcome::failed(
                format!("Failed to decode Gemini response as JSON: {}", e),
                text,
            )
        }
    };

    match Presentation::from_value(value) {
        Some(presentation) => GenerationOutcome::Generated(presentation),
        None => GenerationOutcome::failed("No JSON object found in Gemini response", text),
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    /// Base URL including the API version
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            timeout: defaults.timeout,
        }
    }
}

/// Gemini API client for presentation generation.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> GeminiResult<Self> {
        Self::new(GeminiConfig::from_env())
    }

    fn api_key(&self) -> GeminiResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or(GeminiError::MissingApiKey)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Check that the key works and some model supports `generateContent`.
    pub async fn check_connection(&self) -> HealthStatus {
        match self.list_generation_models().await {
            Ok(0) => HealthStatus::error("No suitable Gemini models found"),
            Ok(_) => HealthStatus::ok("Gemini API connection successful"),
            Err(e) => HealthStatus::error(format!("Error connecting to Gemini API: {}", e)),
        }
    }

    /// Number of listed models supporting `generateContent`.
    async fn list_generation_models(&self) -> GeminiResult<usize> {
        let response = self
            .http
            .get(self.url("models"))
            .header(API_KEY_HEADER, self.api_key()?)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        let list: ModelList = response.json().await?;
        Ok(list
            .models
            .iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent"))
            .count())
    }

    /// Generate a slide deck for an analysis. Never fails; see the module docs.
    pub async fn generate_slides(&self, analysis: &VideoAnalysis, instruction: &str) -> GenerationOutcome {
        let prompt = build_presentation_prompt(analysis, instruction);

        let text = match self.generate_content(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(model = %self.config.model, "Gemini generation failed: {}", e);
                return GenerationOutcome::failed(format!("An unexpected error occurred: {}", e), "N/A");
            }
        };

        debug!(chars = text.len(), "Gemini reply received");
        let outcome = parse_presentation_reply(&text);
        match &outcome {
            GenerationOutcome::Generated(p) => {
                info!(slides = p.slides().len(), "Generated presentation \"{}\"", p.name().unwrap_or_default())
            }
            GenerationOutcome::Failed { error, .. } => warn!("Gemini reply rejected: {}", error),
        }
        outcome
    }

    /// Call `generateContent` and return the first candidate's text.
    async fn generate_content(&self, prompt: &str) -> GeminiResult<String> {
        let path = format!("models/{}:generateContent", self.config.model);
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(self.url(&path))
            .header(API_KEY_HEADER, self.api_key()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, body });
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let text: String = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}
