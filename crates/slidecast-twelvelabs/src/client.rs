//! Twelve Labs HTTP client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use slidecast_models::{HealthStatus, Index, Listing, TaskStatus, UploadOutcome, UploadTask, Video};

use crate::error::{TwelveLabsError, TwelveLabsResult};
use crate::fields::{first_string, TASK_ID_FIELDS, TASK_VIDEO_ID_FIELDS};
use crate::poll::{poll_until, PollOutcome, PollPolicy};
use crate::types::{AnalyzeRequest, AnalyzeResponse, ListResponse, RawIndex, RawVideo, ThumbnailResponse};

/// Prompt sent with every analysis request.
pub const ANALYSIS_PROMPT: &str = "Provide a clear and organized overview of the video, capturing its main theme, purpose, and progression of ideas.

Describe all significant topics, arguments, and perspectives in detail, ensuring that no relevant point is overlooked.

Incorporate observations of visual and auditory elements such as gestures, expressions, tone, and contextual visuals that enrich understanding.";

/// Configuration for the Twelve Labs client.
#[derive(Debug, Clone)]
pub struct TwelveLabsConfig {
    /// API key; `None` when not configured.
    pub api_key: Option<String>,
    /// Base URL including the API version
    pub base_url: String,
    /// Per-request timeout (uploads included)
    pub timeout: Duration,
    /// Delay between task status polls
    pub poll_interval: Duration,
}

impl Default for TwelveLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.twelvelabs.io/v1.3".to_string(),
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl TwelveLabsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("TWELVELABS_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("TWELVELABS_BASE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("TWELVELABS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            poll_interval: std::env::var("TWELVELABS_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
        }
    }
}

/// Thumbnail image fetched through the provider.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Client for the Twelve Labs REST API.
///
/// Holds only the HTTP pool and credentials; safe to share behind an `Arc`.
pub struct TwelveLabsClient {
    http: Client,
    config: TwelveLabsConfig,
}

impl TwelveLabsClient {
    /// Create a new client.
    pub fn new(config: TwelveLabsConfig) -> TwelveLabsResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("slidecast-twelvelabs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TwelveLabsError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> TwelveLabsResult<Self> {
        Self::new(TwelveLabsConfig::from_env())
    }

    pub fn config(&self) -> &TwelveLabsConfig {
        &self.config
    }

    fn api_key(&self) -> TwelveLabsResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or(TwelveLabsError::MissingApiKey)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn get(&self, path: &str) -> TwelveLabsResult<RequestBuilder> {
        let key = self.api_key()?;
        Ok(self
            .http
            .get(self.url(path))
            .header("accept", "application/json")
            .header("x-api-key", key))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> TwelveLabsResult<T> {
        let response = self.get(path)?.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TwelveLabsError::request_failed(format!(
                "GET {} returned {}: {}",
                path, status, body
            )));
        }

        Ok(response.json().await?)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check connectivity. Never fails; problems are reported in the status.
    pub async fn check_connection(&self) -> HealthStatus {
        let request = match self.get("health") {
            Ok(r) => r,
            Err(e) => return HealthStatus::error(e.to_string()),
        };

        match request.send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                HealthStatus::ok("Twelve Labs connection successful")
            }
            Ok(response) => HealthStatus::error(format!(
                "Failed to connect to Twelve Labs: Status {}",
                response.status().as_u16()
            )),
            Err(e) => HealthStatus::error(format!("Error connecting to Twelve Labs: {}", e)),
        }
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// List indexes. Failures degrade to an empty listing.
    pub async fn list_indexes(&self) -> Listing<Index> {
        debug!("Fetching indexes");
        match self.get_json::<ListResponse<RawIndex>>("indexes").await {
            Ok(list) => Listing::ok(list.data.into_iter().map(Index::from).collect()),
            Err(e) => Listing::degraded("list_indexes", format!("Error fetching indexes: {}", e)),
        }
    }

    /// List videos in an index. Failures degrade to an empty listing.
    pub async fn list_videos(&self, index_id: &str) -> Listing<Video> {
        debug!(index_id = %index_id, "Fetching videos");
        let path = format!("indexes/{}/videos", index_id);
        match self.get_json::<ListResponse<RawVideo>>(&path).await {
            Ok(list) => Listing::ok(list.data.into_iter().map(Video::from).collect()),
            Err(e) => Listing::degraded(
                "list_videos",
                format!("Error fetching videos for index {}: {}", index_id, e),
            ),
        }
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Run the fixed analysis prompt against a video.
    ///
    /// Unlike listings, errors propagate: callers must tell a failed analysis
    /// apart from an empty one.
    pub async fn analyze_video(&self, video_id: &str) -> TwelveLabsResult<Value> {
        let key = self.api_key()?;
        info!(video_id = %video_id, "Requesting video analysis");

        let body = AnalyzeRequest {
            video_id,
            prompt: ANALYSIS_PROMPT,
            stream: false,
        };

        let response = self
            .http
            .post(self.url("analyze"))
            .header("accept", "application/json")
            .header("x-api-key", key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(video_id = %video_id, "Analysis request failed: {}", e);
                TwelveLabsError::Network(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(video_id = %video_id, status = %status, "Analysis rejected");
            return Err(TwelveLabsError::request_failed(format!(
                "Twelve Labs analyze returned {}: {}",
                status, body
            )));
        }

        let analysis: AnalyzeResponse = response.json().await?;
        if analysis.data.is_null() {
            return Err(TwelveLabsError::InvalidResponse(
                "analysis response contained no data".to_string(),
            ));
        }

        Ok(analysis.data)
    }

    // =========================================================================
    // Video details
    // =========================================================================

    /// Fetch the provider's raw record for one video. `None` when not found.
    pub async fn get_video_details(&self, index_id: &str, video_id: &str) -> TwelveLabsResult<Option<Value>> {
        let path = format!("indexes/{}/videos/{}?embed=false", index_id, video_id);
        let response = self.get(&path)?.send().await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(TwelveLabsError::request_failed(format!(
                    "Failed to get video details: Status {}: {}",
                    status, body
                )))
            }
        }
    }

    /// Resolve and download a video's thumbnail. `None` when the provider has none.
    pub async fn get_video_thumbnail(&self, index_id: &str, video_id: &str) -> TwelveLabsResult<Option<Thumbnail>> {
        let path = format!("indexes/{}/videos/{}/thumbnail", index_id, video_id);
        let response = self.get(&path)?.send().await?;

        if !response.status().is_success() {
            debug!(
                video_id = %video_id,
                status = %response.status(),
                "Thumbnail endpoint returned non-success"
            );
            return Ok(None);
        }

        let Some(url) = response.json::<ThumbnailResponse>().await?.thumbnail else {
            debug!(video_id = %video_id, "No thumbnail URL in response");
            return Ok(None);
        };

        let image = self.http.get(&url).send().await?;
        if !image.status().is_success() {
            warn!(video_id = %video_id, status = %image.status(), "Failed to fetch thumbnail image");
            return Ok(None);
        }

        let content_type = image
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = image.bytes().await?.to_vec();

        Ok(Some(Thumbnail { bytes, content_type }))
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Upload a local file into an index and wait for indexing to finish.
    ///
    /// Never fails: validation, upload, indexing and timeout problems are all
    /// reported as `UploadOutcome::Failed`. The request is held for up to
    /// `timeout`; there is no cancellation besides dropping the future.
    pub async fn upload_and_index(&self, index_id: &str, file_path: &Path, timeout: Duration) -> UploadOutcome {
        if self.config.api_key.is_none() {
            return UploadOutcome::failed(TwelveLabsError::MissingApiKey.to_string());
        }
        if index_id.trim().is_empty() {
            return UploadOutcome::failed("Missing index_id");
        }
        if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
            return UploadOutcome::failed(format!("File not found: {}", file_path.display()));
        }

        info!(index_id = %index_id, file = %file_path.display(), "Starting upload");

        let task_id = match self.create_upload_task(index_id, file_path).await {
            Ok(id) => id,
            Err(e) => {
                warn!(index_id = %index_id, "Upload task creation failed: {}", e);
                return UploadOutcome::failed(e.to_string());
            }
        };

        info!(task_id = %task_id, "Polling task for completion");

        let policy = PollPolicy::new(self.config.poll_interval, timeout);
        let outcome = poll_until(&policy, || self.get_task(&task_id), |task: &UploadTask| {
            task.status.is_terminal()
        })
        .await;

        match outcome {
            PollOutcome::Finished { value: task, attempts } if task.status.is_success() => {
                info!(
                    task_id = %task_id,
                    video_id = ?task.video_id,
                    attempts,
                    "Indexing completed"
                );
                UploadOutcome::indexed(task)
            }
            PollOutcome::Finished { value: task, .. } => {
                warn!(task_id = %task_id, status = %task.status.as_str(), "Indexing failed");
                UploadOutcome::failed_with_task(
                    format!("Indexing failed with status {}", task.status.as_str()),
                    task.raw,
                )
            }
            PollOutcome::TimedOut { attempts, elapsed } => {
                warn!(
                    task_id = %task_id,
                    attempts,
                    elapsed_secs = elapsed.as_secs(),
                    "Upload timed out"
                );
                UploadOutcome::failed("Upload timed out")
            }
        }
    }

    /// Submit the file as a multipart upload and return the new task id.
    async fn create_upload_task(&self, index_id: &str, file_path: &Path) -> TwelveLabsResult<String> {
        let key = self.api_key()?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let file = tokio::fs::File::open(file_path).await?;
        let length = file.metadata().await?.len();
        let video = Part::stream_with_length(Body::from(file), length).file_name(file_name);

        let form = Form::new()
            .text("index_id", index_id.to_string())
            .part("video_file", video);

        let response = self
            .http
            .post(self.url("tasks"))
            .header("x-api-key", key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(TwelveLabsError::TaskCreation {
                status: status.as_u16(),
                body,
            });
        }

        let json = parse_body(&body)?;
        first_string(&json, TASK_ID_FIELDS).ok_or_else(|| TwelveLabsError::MissingTaskId(json.to_string()))
    }

    /// Fetch the current state of an upload task.
    pub async fn get_task(&self, task_id: &str) -> TwelveLabsResult<UploadTask> {
        let response = self.get(&format!("tasks/{}", task_id))?.send().await?;

        if response.status() != StatusCode::OK {
            return Err(TwelveLabsError::request_failed(format!(
                "Task status returned {}",
                response.status()
            )));
        }

        let raw = parse_body(&response.text().await?)?;
        let status = TaskStatus::parse(raw.get("status").and_then(Value::as_str));
        debug!(task_id = %task_id, status = %status.as_str(), "Task status");

        Ok(UploadTask {
            task_id: task_id.to_string(),
            video_id: first_string(&raw, TASK_VIDEO_ID_FIELDS),
            status,
            raw,
        })
    }
}

/// Parse a response body, treating an empty body as `{}`.
fn parse_body(body: &str) -> TwelveLabsResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TwelveLabsConfig::default();
        assert_eq!(config.base_url, "https://api.twelvelabs.io/v1.3");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert!(config.api_key.is_none());
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env_blank_key_is_missing() {
        std::env::set_var("TWELVELABS_API_KEY", "  ");
        std::env::set_var("TWELVELABS_POLL_INTERVAL_SECS", "5");
        let config = TwelveLabsConfig::from_env();
        assert!(config.api_key.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        std::env::remove_var("TWELVELABS_API_KEY");
        std::env::remove_var("TWELVELABS_POLL_INTERVAL_SECS");
    }

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_body("  ").unwrap(), serde_json::json!({}));
        assert!(parse_body("not json").is_err());
    }

    #[test]
    fn test_analysis_prompt_covers_required_aspects() {
        assert!(ANALYSIS_PROMPT.contains("main theme"));
        assert!(ANALYSIS_PROMPT.contains("arguments"));
        assert!(ANALYSIS_PROMPT.contains("visual and auditory"));
    }
}
