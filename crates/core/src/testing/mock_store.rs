//! Mock catalog store for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::CatalogItem;
use crate::store::{CatalogStore, StoreError};

/// A save recorded by the mock store.
#[derive(Debug, Clone)]
pub struct RecordedSave {
    pub message: String,
    pub items: Vec<CatalogItem>,
}

/// Mock implementation of the [`CatalogStore`] trait.
///
/// Holds the dataset in memory, records every save and can be armed to
/// fail the next load or save with a given message.
pub struct MockCatalogStore {
    items: Arc<RwLock<Vec<CatalogItem>>>,
    saves: Arc<RwLock<Vec<RecordedSave>>>,
    fail_next_load: Arc<RwLock<Option<String>>>,
    fail_next_save: Arc<RwLock<Option<String>>>,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            saves: Arc::new(RwLock::new(Vec::new())),
            fail_next_load: Arc::new(RwLock::new(None)),
            fail_next_save: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the persisted dataset.
    pub async fn set_items(&self, items: Vec<CatalogItem>) {
        *self.items.write().await = items;
    }

    /// Current persisted dataset.
    pub async fn items(&self) -> Vec<CatalogItem> {
        self.items.read().await.clone()
    }

    /// All saves recorded so far.
    pub async fn recorded_saves(&self) -> Vec<RecordedSave> {
        self.saves.read().await.clone()
    }

    /// Make the next `load` fail with a store API error.
    pub async fn fail_next_load(&self, message: &str) {
        *self.fail_next_load.write().await = Some(message.to_string());
    }

    /// Make the next `save` fail with a store API error.
    pub async fn fail_next_save(&self, message: &str) {
        *self.fail_next_save.write().await = Some(message.to_string());
    }
}

impl Default for MockCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn load(&self) -> Result<Vec<CatalogItem>, StoreError> {
        if let Some(message) = self.fail_next_load.write().await.take() {
            return Err(StoreError::Api {
                status: 500,
                message,
            });
        }
        Ok(self.items.read().await.clone())
    }

    async fn save(&self, items: &[CatalogItem], message: &str) -> Result<(), StoreError> {
        if let Some(message) = self.fail_next_save.write().await.take() {
            return Err(StoreError::Api {
                status: 500,
                message,
            });
        }
        self.saves.write().await.push(RecordedSave {
            message: message.to_string(),
            items: items.to_vec(),
        });
        *self.items.write().await = items.to_vec();
        Ok(())
    }
}
