//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "slidecast_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "slidecast_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "slidecast_http_requests_in_flight";

    // Pipeline metrics
    pub const UPLOADS_TOTAL: &str = "slidecast_uploads_total";
    pub const ANALYSES_TOTAL: &str = "slidecast_analyses_total";
    pub const PRESENTATIONS_TOTAL: &str = "slidecast_presentations_total";
}

static VIDEO_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/videos/[^/]+").expect("valid regex")
});

static INDEX_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/indexes/[^/]+").expect("valid regex")
});

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record an upload outcome (`indexed` or `failed`).
pub fn record_upload(outcome: &str) {
    counter!(names::UPLOADS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Record an analysis outcome.
pub fn record_analysis(outcome: &str) {
    counter!(names::ANALYSES_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Record a presentation generation outcome.
pub fn record_presentation(outcome: &str) {
    counter!(names::PRESENTATIONS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Replace ids in a path with placeholders to keep label cardinality bounded.
fn sanitize_path(path: &str) -> String {
    let path = INDEX_SEGMENT.replace_all(path, "/indexes/:index_id");
    VIDEO_SEGMENT.replace_all(&path, "/videos/:video_id").into_owned()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
