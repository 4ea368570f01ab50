//! Realtime Database REST client.
//!
//! Every node is addressable as `{database_url}/{path}.json`. Reads return the
//! JSON at that node (`null` when absent); writes replace the node.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};

use crate::error::{RtdbError, RtdbResult};
use crate::metrics::record_request;
use crate::retry::{with_retry, RetryConfig};
use crate::token_cache::TokenCache;

// =============================================================================
// Configuration
// =============================================================================

/// Realtime Database client configuration.
#[derive(Debug, Clone)]
pub struct RtdbConfig {
    /// Database URL, e.g. `https://my-app-default-rtdb.firebaseio.com`
    pub database_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl RtdbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> RtdbResult<Self> {
        let database_url = std::env::var("FIREBASE_DATABASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RtdbError::Config("Missing Firebase database URL".to_string()))?;

        let connect_timeout_secs: u64 = std::env::var("RTDB_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
            ..Self::new(database_url)
        })
    }
}

/// How requests are authorized.
#[derive(Clone)]
pub enum DatabaseAuth {
    /// OAuth access token from a service account, sent as `access_token`.
    ServiceAccount(Arc<TokenCache>),
    /// Legacy database secret, sent as `auth`.
    Secret(String),
    /// No credentials; only works against open rules or the emulator.
    Anonymous,
}

impl DatabaseAuth {
    /// Pick credentials from the environment.
    ///
    /// `GOOGLE_APPLICATION_CREDENTIALS` wins over `FIREBASE_DATABASE_SECRET`.
    pub fn from_env() -> RtdbResult<Self> {
        let service_account = CustomServiceAccount::from_env()
            .map_err(|e| RtdbError::auth_error(format!("Failed to load service account: {}", e)))?;

        if let Some(sa) = service_account {
            let provider: Arc<dyn TokenProvider> = Arc::new(sa);
            return Ok(Self::ServiceAccount(Arc::new(TokenCache::new(provider))));
        }

        match std::env::var("FIREBASE_DATABASE_SECRET") {
            Ok(secret) if !secret.is_empty() => Ok(Self::Secret(secret)),
            _ => {
                warn!("No database credentials configured, using unauthenticated access");
                Ok(Self::Anonymous)
            }
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Realtime Database REST client. Cheap to clone.
#[derive(Clone)]
pub struct RealtimeDbClient {
    http: Client,
    config: RtdbConfig,
    auth: DatabaseAuth,
}

impl RealtimeDbClient {
    /// Create a new client.
    pub fn new(config: RtdbConfig, auth: DatabaseAuth) -> RtdbResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("slidecast-rtdb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RtdbError::from)?;

        Ok(Self { http, config, auth })
    }

    /// Create from environment variables.
    pub fn from_env() -> RtdbResult<Self> {
        Self::new(RtdbConfig::from_env()?, DatabaseAuth::from_env()?)
    }

    /// URL of the node at `path`; each segment is percent-encoded.
    fn node_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!(
            "{}/{}.json",
            self.config.database_url.trim_end_matches('/'),
            encoded.join("/")
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> RtdbResult<RequestBuilder> {
        Ok(match &self.auth {
            DatabaseAuth::ServiceAccount(cache) => {
                let token = cache.get_token().await?;
                request.query(&[("access_token", token.as_str())])
            }
            DatabaseAuth::Secret(secret) => request.query(&[("auth", secret.as_str())]),
            DatabaseAuth::Anonymous => request,
        })
    }

    /// Turn a non-success response into an error.
    ///
    /// A 401 with service account auth drops the cached token and is reported
    /// as retryable so the next attempt fetches a fresh one.
    async fn check_status(&self, response: Response, path: &str) -> RtdbResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            if let DatabaseAuth::ServiceAccount(cache) = &self.auth {
                cache.invalidate().await;
                return Err(RtdbError::TokenExpired(format!("{}: {}", path, body)));
            }
        }

        Err(RtdbError::from_http_status(
            status.as_u16(),
            format!("{} failed with {}: {}", path, status, body),
        ))
    }

    async fn execute<T, F, Fut>(&self, operation: &str, path: &str, op: F) -> RtdbResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = RtdbResult<T>>,
    {
        let span = info_span!("rtdb_request", operation = %operation, path = %path);

        let start = Instant::now();
        let result = with_retry(&self.config.retry, operation, op).instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    // =========================================================================
    // Node operations
    // =========================================================================

    /// Read the JSON at `path`; `Value::Null` when nothing is stored.
    pub async fn get_value(&self, path: &str) -> RtdbResult<Value> {
        let url = self.node_url(path);

        self.execute("get", path, || async {
            let request = self.authorize(self.http.get(&url)).await?;
            let response = self.check_status(request.send().await?, path).await?;
            let text = response.text().await?;
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_str(&text)?)
        })
        .await
    }

    /// Read and deserialize the node at `path`. `None` when nothing is stored.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RtdbResult<Option<T>> {
        match self.get_value(path).await? {
            Value::Null => Ok(None),
            value => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Replace the node at `path` with `value`.
    pub async fn set<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> RtdbResult<()> {
        let url = self.node_url(path);
        let body = serde_json::to_value(value)?;

        self.execute("set", path, || async {
            let request = self.authorize(self.http.put(&url)).await?;
            self.check_status(request.json(&body).send().await?, path).await?;
            debug!(path = %path, "Node written");
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_requires_database_url() {
        std::env::remove_var("FIREBASE_DATABASE_URL");
        let err = RtdbConfig::from_env().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Missing Firebase database URL");
    }

    #[test]
    #[serial]
    fn test_config_default_values() {
        std::env::set_var("FIREBASE_DATABASE_URL", "https://demo.firebaseio.com");
        std::env::remove_var("RTDB_CONNECT_TIMEOUT_SECS");
        let config = RtdbConfig::from_env().unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(30));
        std::env::remove_var("FIREBASE_DATABASE_URL");
    }

    #[test]
    fn test_node_url_encodes_segments() {
        let client = RealtimeDbClient::new(
            RtdbConfig::new("https://demo.firebaseio.com/"),
            DatabaseAuth::Anonymous,
        )
        .unwrap();
        assert_eq!(
            client.node_url("/presentations/my video"),
            "https://demo.firebaseio.com/presentations/my%20video.json"
        );
        assert_eq!(client.node_url("presentations"), "https://demo.firebaseio.com/presentations.json");
    }
}
