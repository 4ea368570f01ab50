//! Twelve Labs index model.

use serde::{Deserialize, Serialize};

/// A named collection of videos in Twelve Labs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub id: String,
    pub name: String,
}

impl Index {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
