//! Local file store for development and tests.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{decode_csv, encode_csv, CatalogItem};

use super::{CatalogStore, StoreError};

/// File store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Path of the dataset CSV file.
    pub path: PathBuf,
}

/// Catalog store backed by a local CSV file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(config: FileStoreConfig) -> Self {
        Self { path: config.path }
    }
}

#[async_trait]
impl CatalogStore for FileStore {
    async fn load(&self) -> Result<Vec<CatalogItem>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(decode_csv(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "dataset file not found, loading empty dataset");
                Ok(Vec::new())
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn save(&self, items: &[CatalogItem], message: &str) -> Result<(), StoreError> {
        debug!(path = %self.path.display(), rows = items.len(), message, "saving dataset");
        let csv = encode_csv(items)?;
        tokio::fs::write(&self.path, csv).await?;
        Ok(())
    }
}
