use std::sync::Arc;

use marquee_core::{CatalogView, Config, SanitizedConfig, SyncEngine};

/// Shared application state
pub struct AppState {
    config: Config,
    engine: Arc<SyncEngine>,
    view: CatalogView,
}

impl AppState {
    pub fn new(config: Config, engine: Arc<SyncEngine>, view: CatalogView) -> Self {
        Self {
            config,
            engine,
            view,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }
}
