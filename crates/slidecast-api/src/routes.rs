//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    analyze_video, gemini_health, generate_presentation, get_analysis, get_presentation,
    get_video_details, get_video_thumbnail, list_indexes, list_presentations, list_videos, root,
    twelvelabs_health, upload_video,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health/twelvelabs", get(twelvelabs_health))
        .route("/health/gemini", get(gemini_health));

    let index_routes = Router::new()
        .route("/indexes", get(list_indexes))
        .route("/indexes/:index_id/videos", get(list_videos))
        .route("/indexes/:index_id/videos/:video_id", get(get_video_details))
        .route("/indexes/:index_id/videos/:video_id/thumbnail", get(get_video_thumbnail));

    let video_routes = Router::new()
        .route("/videos/:video_id/analyze", post(analyze_video))
        .route("/videos/:video_id/analysis", get(get_analysis))
        .route(
            "/videos/:video_id/presentation",
            post(generate_presentation).get(get_presentation),
        )
        .route("/presentations", get(list_presentations))
        .route("/upload", post(upload_video));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(health_routes)
        .merge(index_routes)
        .merge(video_routes)
        .merge(metrics_routes)
        // Multipart uploads are bounded by the layer below, not axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
