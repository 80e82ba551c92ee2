//! Ordered-fallback metadata resolution.

use tracing::{debug, warn};

use crate::config::MetadataConfig;

use super::{
    BrasilApiProvider, MetadataError, MetadataProvider, OpenLibraryProvider, ProviderResponse,
};

/// Resolves an identifying code against a ranked list of providers.
pub struct MetadataResolver {
    providers: Vec<Box<dyn MetadataProvider>>,
}

impl MetadataResolver {
    /// Build a resolver over an explicit provider list (highest priority
    /// first).
    pub fn new(providers: Vec<Box<dyn MetadataProvider>>) -> Self {
        Self { providers }
    }

    /// Build the default provider chain: Open Library, then BrasilAPI.
    pub fn from_config(config: &MetadataConfig) -> Result<Self, MetadataError> {
        Ok(Self::new(vec![
            Box::new(OpenLibraryProvider::new(config.openlibrary.clone())?),
            Box::new(BrasilApiProvider::new(config.brasilapi.clone())?),
        ]))
    }

    /// Resolve a code to normalized metadata.
    ///
    /// Providers are queried in order; the first one returning usable field
    /// data wins and the rest are not contacted. Transport errors and empty
    /// answers are logged and treated the same way: try the next provider.
    /// When every provider comes up empty the result is all-absent - this
    /// method never fails.
    pub async fn resolve(&self, code: &str) -> ProviderResponse {
        for provider in &self.providers {
            match provider.try_resolve(code).await {
                Ok(Some(response)) if !response.is_empty() => {
                    debug!(code, provider = provider.name(), "metadata resolved");
                    return response;
                }
                Ok(_) => {
                    debug!(code, provider = provider.name(), "no metadata from provider");
                }
                Err(e) => {
                    warn!(code, provider = provider.name(), error = %e, "provider lookup failed");
                }
            }
        }
        debug!(code, "no provider returned metadata");
        ProviderResponse::default()
    }
}
