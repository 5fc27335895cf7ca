//! Application state.

use std::sync::Arc;

use vblog_ai_client::{AiClient, AiResult};
use vblog_storage::ArtifactStore;

use crate::config::ApiConfig;
use crate::services::SubmissionService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub ai_client: Arc<AiClient>,
    pub submissions: SubmissionService,
}

impl AppState {
    /// Create application state with an AI client configured from the environment.
    pub fn new(config: ApiConfig) -> AiResult<Self> {
        let ai_client = AiClient::from_env()?;
        Ok(Self::with_client(config, ai_client))
    }

    /// Create application state around an existing AI client.
    pub fn with_client(config: ApiConfig, ai_client: AiClient) -> Self {
        let ai_client = Arc::new(ai_client);
        let store = ArtifactStore::new(config.upload_dir.clone());
        let submissions =
            SubmissionService::new(Arc::clone(&ai_client), store, config.max_upload_size)
                .with_error_details(!config.is_production());

        Self {
            config,
            ai_client,
            submissions,
        }
    }
}
