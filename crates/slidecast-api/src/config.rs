//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Directory for uploads awaiting transfer to Twelve Labs
    pub upload_dir: PathBuf,
    /// How long an upload request waits for indexing to finish
    pub upload_timeout: Duration,
    /// URL pinged by the keep-alive task; disabled when unset
    pub app_url: Option<String>,
    /// Interval between keep-alive pings
    pub keep_alive_interval: Duration,
    /// Expose Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            max_body_size: 512 * 1024 * 1024, // 512MB
            upload_dir: PathBuf::from("uploads"),
            upload_timeout: Duration::from_secs(900),
            app_url: None,
            keep_alive_interval: Duration::from_secs(540),
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            upload_timeout: std::env::var("UPLOAD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.upload_timeout),
            app_url: std::env::var("APP_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            keep_alive_interval: std::env::var("KEEP_ALIVE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.keep_alive_interval),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "HOST",
        "PORT",
        "ALLOWED_ORIGINS",
        "MAX_BODY_SIZE",
        "UPLOAD_DIR",
        "UPLOAD_TIMEOUT_SECS",
        "APP_URL",
        "KEEP_ALIVE_INTERVAL_SECS",
        "METRICS_ENABLED",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = ApiConfig::from_env();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.upload_timeout, Duration::from_secs(900));
        assert_eq!(config.keep_alive_interval, Duration::from_secs(540));
        assert!(config.app_url.is_none());
    }

    #[test]
    #[serial]
    fn test_origins_are_split_and_trimmed() {
        clear_env();
        std::env::set_var("ALLOWED_ORIGINS", "https://a.example, https://b.example,");
        std::env::set_var("PORT", "8080");
        std::env::set_var("APP_URL", "  ");

        let config = ApiConfig::from_env();
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.port, 8080);
        assert!(config.app_url.is_none());

        clear_env();
    }
}
