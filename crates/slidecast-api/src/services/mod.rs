//! Services used by the request handlers.

pub mod gemini;
pub mod keep_alive;

pub use gemini::{GeminiClient, GeminiConfig, GeminiError};
pub use keep_alive::KeepAlive;
