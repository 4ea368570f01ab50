//! Shared data models for the Slidecast backend.
//!
//! This crate provides Serde-serializable types for:
//! - Twelve Labs indexes, videos and upload tasks
//! - Stored video analyses and generated presentations
//! - Provider health checks and soft-failure listings

pub mod analysis;
pub mod health;
pub mod index;
pub mod listing;
pub mod presentation;
pub mod task;
pub mod video;

// Re-export common types
pub use analysis::VideoAnalysis;
pub use health::{HealthState, HealthStatus};
pub use index::Index;
pub use listing::Listing;
pub use presentation::{GenerationOutcome, Presentation, DEFAULT_SLIDE_COUNT};
pub use task::{TaskStatus, UploadOutcome, UploadTask};
pub use video::{Video, VideoId};
