//! Bibliographic metadata resolution.
//!
//! Newly imported items carry only an identifying code (ISBN or similar);
//! this module backfills title, authors, publisher, year, pages and cover
//! URL by querying external metadata providers in priority order. Lookup is
//! best-effort: a provider that times out, answers non-200 or returns no
//! usable fields is skipped, and when every provider comes up empty the
//! resolver yields an all-absent response instead of failing.

mod brasilapi;
mod openlibrary;
mod resolver;
mod types;

pub use brasilapi::{BrasilApiConfig, BrasilApiProvider};
pub use openlibrary::{OpenLibraryConfig, OpenLibraryProvider};
pub use resolver::MetadataResolver;
pub use types::ProviderResponse;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a single provider lookup.
///
/// These never cross the resolver boundary: the resolver logs them and
/// moves on to the next provider.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed (timeout, connection error).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but the payload did not decode.
    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

/// A single external metadata provider.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider display name, recorded on resolved items as `source`.
    fn name(&self) -> &str;

    /// Look up one code. `Ok(None)` means the provider has no data for it
    /// (non-200 status or empty payload); `Err` means the call itself
    /// failed. Both are non-fatal to the resolution loop.
    async fn try_resolve(&self, code: &str) -> Result<Option<ProviderResponse>, MetadataError>;
}
