//! Liveness and provider health handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use slidecast_models::HealthStatus;

use crate::state::AppState;

/// Liveness response.
#[derive(Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// `GET /`
pub async fn root() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "ok" })
}

/// `GET /health/twelvelabs`
pub async fn twelvelabs_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.twelvelabs.check_connection().await)
}

/// `GET /health/gemini`
pub async fn gemini_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.gemini.check_connection().await)
}
