//! Average market price scraping and dataset enrichment.
//!
//! The marketplace exposes no structured price API; prices are embedded as
//! currency-marked text inside the HTML of a search results page. The
//! extraction step is deliberately isolated ([`extract_price_fragments`])
//! so it can be swapped when the markup changes without touching the
//! averaging and query-fallback logic in [`PriceScraper`].

mod enrich;
mod extract;
mod scraper;

pub use enrich::{enrich_prices, EnrichReport};
pub use extract::{extract_price_fragments, parse_price_fragment, representative_price};
pub use scraper::{PriceScraper, PriceScraperConfig};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the pricing module.
///
/// Scraping itself is best-effort and reports "no price" as `None`; only
/// construction of the HTTP client can fail.
#[derive(Debug, Error)]
pub enum PriceError {
    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Anything that can estimate a representative market price for an item.
///
/// Implemented by [`PriceScraper`]; the enrichment pass and tests accept
/// any implementation.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Estimate the average market price for an item, or `None` when no
    /// price could be found. `None` is explicitly distinct from zero.
    async fn estimate_price(&self, title: &str, year: &str, publisher: &str) -> Option<f64>;
}
