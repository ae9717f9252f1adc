use std::sync::Arc;

use catalog_search::config::AppConfig;
use catalog_search::CatalogService;

/// Shared handler state / 共享状态
pub struct AppState {
    pub service: Arc<CatalogService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let service = CatalogService::new(
            config.render.container_id.clone(),
            config.search.clone(),
            config.render.template.clone(),
        );
        Self {
            service: Arc::new(service),
            config,
        }
    }
}
