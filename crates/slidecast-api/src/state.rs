//! Application state.

use std::sync::Arc;

use slidecast_rtdb::{RealtimeDbClient, ResultStore};
use slidecast_twelvelabs::TwelveLabsClient;

use crate::config::ApiConfig;
use crate::services::GeminiClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub twelvelabs: Arc<TwelveLabsClient>,
    pub gemini: Arc<GeminiClient>,
    pub store: Arc<ResultStore>,
}

impl AppState {
    /// Create new application state with clients configured from the environment.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let twelvelabs = TwelveLabsClient::from_env()?;
        let gemini = GeminiClient::from_env()?;
        let store = ResultStore::new(RealtimeDbClient::from_env()?);

        Ok(Self::from_parts(config, twelvelabs, gemini, store))
    }

    /// Assemble state from already-built clients.
    pub fn from_parts(
        config: ApiConfig,
        twelvelabs: TwelveLabsClient,
        gemini: GeminiClient,
        store: ResultStore,
    ) -> Self {
        Self {
            config,
            twelvelabs: Arc::new(twelvelabs),
            gemini: Arc::new(gemini),
            store: Arc::new(store),
        }
    }
}
