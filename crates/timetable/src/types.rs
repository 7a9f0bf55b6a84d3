/// Shared server state
use crate::catalog::{AnyCatalogProvider, CatalogCache, CatalogError};
use crate::config::TimetableConfig;
use crate::session::SessionStore;
use std::time::Duration;

pub struct AppState {
    pub config: TimetableConfig,
    pub catalog: CatalogCache<AnyCatalogProvider>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: TimetableConfig, provider: AnyCatalogProvider) -> Self {
        let ttl = Duration::from_secs(config.catalog_ttl_secs);
        Self {
            catalog: CatalogCache::new(provider, ttl),
            sessions: SessionStore::new(),
            config,
        }
    }

    /// Builds the state with the catalog provider named in the config.
    pub fn from_config(config: TimetableConfig) -> Result<Self, CatalogError> {
        let provider = config.provider()?;
        Ok(Self::new(config, provider))
    }
}
