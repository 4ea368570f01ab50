//! Firebase Realtime Database REST client.
//!
//! This crate provides:
//! - A JSON node client (`GET`/`PUT` on `{path}.json`)
//! - `ResultStore`, the per-video store for analyses and presentations
//! - Service account authentication via gcp_auth, or a legacy database secret
//! - Retry with exponential backoff and request metrics

pub mod client;
pub mod error;
pub mod metrics;
pub mod retry;
pub mod store;
pub mod token_cache;

#[cfg(test)]
mod client_tests;

pub use client::{DatabaseAuth, RealtimeDbClient, RtdbConfig};
pub use error::{RtdbError, RtdbResult};
pub use retry::RetryConfig;
pub use store::ResultStore;
