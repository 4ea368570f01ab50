//! Soft-failure listing wrapper.
//!
//! List-style reads against providers never fail the request. A `Listing`
//! carries either the fetched items or an empty result together with the
//! error that was logged and swallowed.

use tracing::warn;

/// Items from a list-style read, or an empty fallback with the swallowed error.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    items: Vec<T>,
    error: Option<String>,
}

impl<T> Listing<T> {
    /// A successful listing.
    pub fn ok(items: Vec<T>) -> Self {
        Self { items, error: None }
    }

    /// An empty listing standing in for a failed read. The error is logged here.
    pub fn degraded(operation: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        warn!(operation = %operation, "List read degraded to empty result: {}", error);
        Self {
            items: Vec::new(),
            error: Some(error),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The swallowed error, if the read failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> From<Result<Vec<T>, String>> for Listing<T> {
    fn from(result: Result<Vec<T>, String>) -> Self {
        match result {
            Ok(items) => Self::ok(items),
            Err(e) => Self::degraded("listing", e),
        }
    }
}
