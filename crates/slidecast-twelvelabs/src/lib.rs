//! Client for the Twelve Labs video understanding API.
//!
//! This crate provides:
//! - Index and video listings with soft-failure semantics
//! - Video analysis via the `/analyze` endpoint
//! - Multipart upload with bounded task polling
//! - Video details and thumbnail lookup

pub mod client;
pub mod error;
pub mod fields;
pub mod poll;
pub mod types;


pub use client::{Thumbnail, TwelveLabsClient, TwelveLabsConfig, ANALYSIS_PROMPT};
pub use error::{TwelveLabsError, TwelveLabsResult};
pub use poll::{poll_until, PollOutcome, PollPolicy};
