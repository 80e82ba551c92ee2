use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use acervo_core::{
    CatalogItem, CatalogStore, Config, IdentityKey, MetadataResolver, PriceSource,
    SanitizedConfig, StoreError,
};

/// Shared application state.
///
/// Holds the session cache of the persisted dataset: reads go through the
/// cache so the remote store is hit once per session, and every successful
/// write-through refreshes it.
pub struct AppState {
    config: Config,
    store: Arc<dyn CatalogStore>,
    resolver: Arc<MetadataResolver>,
    price_source: Arc<dyn PriceSource>,
    cache: RwLock<Option<Vec<CatalogItem>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn CatalogStore>,
        resolver: Arc<MetadataResolver>,
        price_source: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            config,
            store,
            resolver,
            price_source,
            cache: RwLock::new(None),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn resolver(&self) -> &MetadataResolver {
        &self.resolver
    }

    pub fn price_source(&self) -> &dyn PriceSource {
        self.price_source.as_ref()
    }

    pub fn identity_key(&self) -> IdentityKey {
        self.config.catalog.identity_key
    }

    /// Inter-request delay for the enrichment pass.
    pub fn price_delay(&self) -> Duration {
        Duration::from_millis(self.config.pricing.request_delay_ms)
    }

    /// Current dataset, served from the session cache unless `refresh`
    /// forces a reload from the store.
    pub async fn dataset(&self, refresh: bool) -> Result<Vec<CatalogItem>, StoreError> {
        if !refresh {
            if let Some(items) = self.cache.read().await.as_ref() {
                return Ok(items.clone());
            }
        }
        let items = self.store.load().await?;
        *self.cache.write().await = Some(items.clone());
        Ok(items)
    }

    /// Persist a new dataset and refresh the session cache.
    pub async fn commit(
        &self,
        items: Vec<CatalogItem>,
        message: &str,
    ) -> Result<(), StoreError> {
        self.store.save(&items, message).await?;
        *self.cache.write().await = Some(items);
        Ok(())
    }
}
