use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::tryon::TryOnOrchestrator;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<TryOnOrchestrator>,
}

impl AppState {
    pub fn new(config: AppConfig, orchestrator: TryOnOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }
}
