//! Mock metadata provider for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::metadata::{MetadataError, MetadataProvider, ProviderResponse};

/// Mock implementation of the [`MetadataProvider`] trait.
///
/// Configure a canned response or a failure; every lookup is counted so
/// tests can assert which providers were actually queried.
pub struct MockProvider {
    name: String,
    response: Option<ProviderResponse>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// A provider with the given name that returns no data.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: None,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return this response for every lookup.
    pub fn with_response(mut self, response: ProviderResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Fail every lookup with a parse error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Shared lookup counter for assertions.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl MetadataProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_resolve(&self, _code: &str) -> Result<Option<ProviderResponse>, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MetadataError::Parse("mock failure".to_string()));
        }
        Ok(self.response.clone())
    }
}
