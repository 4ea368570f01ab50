//! Background task that pings the public app URL so the host does not idle out.

use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, StatusCode};
use tokio::time::{interval_at, Instant};
use tracing::{error, info, warn};

use crate::config::ApiConfig;

/// Periodic GET against `APP_URL`.
pub struct KeepAlive {
    http: Client,
    url: String,
    interval: Duration,
}

impl KeepAlive {
    pub fn new(url: impl Into<String>, interval: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build keep-alive HTTP client")?;

        Ok(Self {
            http,
            url: url.into(),
            interval,
        })
    }

    /// `None` when no app URL is configured.
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Option<Self>> {
        match &config.app_url {
            Some(url) => Ok(Some(Self::new(url.clone(), config.keep_alive_interval)?)),
            None => Ok(None),
        }
    }

    /// Run forever; spawn as a background task.
    ///
    /// The first ping happens one interval after start.
    pub async fn run(&self) {
        info!(url = %self.url, "Starting keep-alive pinger (interval: {:?})", self.interval);

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);

        loop {
            ticker.tick().await;

            match self.ping().await {
                Ok(StatusCode::OK) => info!(url = %self.url, "Keep-alive ping succeeded"),
                Ok(status) => warn!(url = %self.url, status = %status, "Keep-alive ping returned non-200"),
                Err(e) => error!(url = %self.url, "Keep-alive ping failed: {:#}", e),
            }
        }
    }

    /// Single ping, returning the response status.
    pub async fn ping(&self) -> anyhow::Result<StatusCode> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;
        Ok(response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_disabled_without_app_url() {
        let config = ApiConfig::default();
        assert!(KeepAlive::from_config(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ping_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let pinger = KeepAlive::new(server.uri(), Duration::from_secs(540)).unwrap();
        assert_eq!(pinger.ping().await.unwrap(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ping_unreachable_is_error() {
        let pinger = KeepAlive::new("http://127.0.0.1:9", Duration::from_secs(540)).unwrap();
        let err = pinger.ping().await.unwrap_err();
        assert!(format!("{:#}", err).starts_with("GET http://127.0.0.1:9"));
    }
}
