//! Mock price source for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::pricing::PriceSource;

/// Mock implementation of the [`PriceSource`] trait.
///
/// Prices are keyed by title; unknown titles resolve to `None`, which is
/// exactly the scraper's "no price found" behavior. Every call is
/// recorded for assertions.
pub struct MockPriceSource {
    prices: HashMap<String, f64>,
    calls: Arc<RwLock<Vec<(String, String, String)>>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Configure a price for a title.
    pub fn with_price(mut self, title: &str, price: f64) -> Self {
        self.prices.insert(title.to_string(), price);
        self
    }

    /// The `(title, year, publisher)` tuples estimated so far.
    pub async fn recorded_calls(&self) -> Vec<(String, String, String)> {
        self.calls.read().await.clone()
    }
}

impl Default for MockPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn estimate_price(&self, title: &str, year: &str, publisher: &str) -> Option<f64> {
        self.calls.write().await.push((
            title.to_string(),
            year.to_string(),
            publisher.to_string(),
        ));
        self.prices.get(title).copied()
    }
}
