//! Axum HTTP API server.
//!
//! This crate provides:
//! - Upload, analysis and presentation endpoints over Twelve Labs and Gemini
//! - Result persistence in the Firebase Realtime Database
//! - Prometheus metrics and a keep-alive pinger

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{GeminiClient, GeminiConfig, KeepAlive};
pub use state::AppState;
