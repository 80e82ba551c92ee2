//! Dataset persistence.
//!
//! The catalog lives as one CSV file in a remote version-controlled
//! content store (GitHub contents API); a plain file store backs local
//! development and tests. The system assumes a single active writer:
//! concurrent sessions race with last-write-wins and no merge-conflict
//! detection.

mod file;
mod github;

pub use file::{FileStore, FileStoreConfig};
pub use github::{GithubStore, GithubStoreConfig};

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogItem};

/// Errors from the persistence layer.
///
/// Store failures are surfaced distinctly from validation failures so
/// callers can tell "nothing was saved" from "some rows could not be
/// priced".
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failure (timeout, connection error).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store rejected the request.
    #[error("store API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Fetched content could not be decoded.
    #[error("failed to decode stored content: {0}")]
    Decode(String),

    /// The stored dataset is not valid CSV.
    #[error("dataset error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence collaborator for the catalog dataset.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load the current persisted dataset. A missing file loads as an
    /// empty dataset.
    async fn load(&self) -> Result<Vec<CatalogItem>, StoreError>;

    /// Persist the dataset, replacing the previous content. `message`
    /// describes the change for stores that keep history.
    async fn save(&self, items: &[CatalogItem], message: &str) -> Result<(), StoreError>;
}
