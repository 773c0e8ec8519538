use async_trait::async_trait;
use std::sync::Arc;

use crate::research::orchestrator::SubmissionOrchestrator;
use crate::types::Result;
use crate::utils::toml_config::DigestConfigManager;

/// Builds a fresh orchestrator for each submission
#[async_trait]
pub trait OrchestratorFactory: Send + Sync {
    async fn create(&self) -> Result<SubmissionOrchestrator>;
}

/// Factory reading the current (hot-reloaded) configuration on every call
pub struct ConfigBasedOrchestratorFactory {
    config_manager: Arc<DigestConfigManager>,
}

impl ConfigBasedOrchestratorFactory {
    pub fn new(config_manager: Arc<DigestConfigManager>) -> Self {
        Self { config_manager }
    }
}

#[async_trait]
impl OrchestratorFactory for ConfigBasedOrchestratorFactory {
    async fn create(&self) -> Result<SubmissionOrchestrator> {
        let config = self.config_manager.config();
        SubmissionOrchestrator::from_config(&config.pipeline_config()).await
    }
}
