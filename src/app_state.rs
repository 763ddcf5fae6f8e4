use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{PageStore, SqlitePageStore};
use crate::services::{PageResolver, Renderer};

/// Shared application state for the HTTP layer.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn PageStore>,
    pub resolver: Arc<PageResolver>,
}

impl AppState {
    pub async fn new(config: Config, renderer: Arc<dyn Renderer>) -> AppResult<Self> {
        let store: Arc<dyn PageStore> =
            Arc::new(SqlitePageStore::connect(&config.database.url).await?);
        let resolver = Arc::new(PageResolver::new(
            store.clone(),
            config.pages.clone(),
            renderer,
        ));

        Ok(Self {
            config,
            store,
            resolver,
        })
    }
}
