//! Provider health check result.

use serde::{Deserialize, Serialize};

/// Outcome of a provider connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Ok,
    Error,
}

/// Health status returned by `/health/*` endpoints.
///
/// Health checks never fail; problems are reported through `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub message: String,
}

impl HealthStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Error,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HealthState::Ok
    }
}
