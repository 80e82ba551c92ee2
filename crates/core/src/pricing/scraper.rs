//! Marketplace search-page price scraper.
//!
//! Two-tier query fallback: a narrow search filtered by publisher first,
//! then a broad title-only search when the narrow one yields no prices.
//! Requests carry a browser-like user agent; anti-scraping defenses block
//! the default reqwest one.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::extract::{extract_price_fragments, parse_price_fragment, representative_price};
use super::{PriceError, PriceSource};

/// Price scraper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceScraperConfig {
    /// Marketplace base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent header sent with every search request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Delay between successive scrapes in the enrichment pass, in
    /// milliseconds (default: 2000). Anti-throttling, not correctness.
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,
}

fn default_base_url() -> String {
    "https://www.estantevirtual.com.br".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_request_delay() -> u64 {
    2000
}

impl Default for PriceScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            request_delay_ms: default_request_delay(),
        }
    }
}

/// Scrapes a representative average price from marketplace search results.
pub struct PriceScraper {
    client: Client,
    base_url: String,
}

impl PriceScraper {
    pub fn new(config: &PriceScraperConfig) -> Result<Self, PriceError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Narrow query: title plus publisher filter.
    fn narrow_query_url(&self, title: &str, publisher: &str) -> String {
        format!(
            "{}/busca?q={}&searchField=titulo-autor&editora={}",
            self.base_url,
            urlencoding::encode(&title.to_lowercase()),
            urlencoding::encode(&publisher.to_lowercase().replace(' ', "-")),
        )
    }

    /// Broad query: title only.
    fn broad_query_url(&self, title: &str) -> String {
        format!(
            "{}/busca?q={}&searchField=titulo-autor",
            self.base_url,
            urlencoding::encode(&title.to_lowercase()),
        )
    }

    async fn fetch_document(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }

    fn prices_in_document(html: &str) -> Vec<f64> {
        extract_price_fragments(html)
            .iter()
            .filter_map(|fragment| parse_price_fragment(fragment))
            .collect()
    }
}

/// Pick the estimate across the two query tiers.
///
/// A primary document with any valid price settles the estimate; the
/// fallback is fetched only when the primary answered with none. A
/// fallback fetch failure or an empty fallback document resolve to `None`.
async fn select_estimate<F>(primary: &[f64], fallback: F) -> Option<f64>
where
    F: Future<Output = Option<Vec<f64>>>,
{
    if let Some(average) = representative_price(primary) {
        return Some(average);
    }
    let secondary = fallback.await?;
    representative_price(&secondary)
}

#[async_trait]
impl PriceSource for PriceScraper {
    /// Estimate the average market price for an item.
    ///
    /// Transport failures are logged and resolve to `None`; they never
    /// propagate. The year is part of the contract but not encoded into
    /// either query - the search endpoint has no usable year filter.
    async fn estimate_price(&self, title: &str, _year: &str, publisher: &str) -> Option<f64> {
        let narrow = self.narrow_query_url(title, publisher);
        let html = match self.fetch_document(&narrow).await {
            Ok(html) => html,
            Err(e) => {
                warn!(title, error = %e, "price search request failed");
                return None;
            }
        };

        let primary = Self::prices_in_document(&html);
        let estimate = select_estimate(&primary, async {
            // Narrow query answered but found nothing; retry without the
            // publisher filter.
            match self.fetch_document(&self.broad_query_url(title)).await {
                Ok(html) => Some(Self::prices_in_document(&html)),
                Err(e) => {
                    warn!(title, error = %e, "fallback price search request failed");
                    None
                }
            }
        })
        .await;

        match estimate {
            Some(average) => debug!(title, average, "search priced"),
            None => debug!(title, "no price found"),
        }
        estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> PriceScraper {
        PriceScraper::new(&PriceScraperConfig {
            base_url: "https://marketplace.test/".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_narrow_query_url_encodes_fields() {
        let url = scraper().narrow_query_url("Grande Sertão", "Companhia das Letras");
        assert_eq!(
            url,
            "https://marketplace.test/busca?q=grande%20sert%C3%A3o\
             &searchField=titulo-autor&editora=companhia-das-letras"
        );
    }

    #[test]
    fn test_broad_query_url_omits_publisher() {
        let url = scraper().broad_query_url("Iracema");
        assert_eq!(
            url,
            "https://marketplace.test/busca?q=iracema&searchField=titulo-autor"
        );
    }

    #[test]
    fn test_prices_in_document_skips_malformed() {
        let html = "<span>R$ 10,00</span><span>R$ 1,2,3</span><span>R$ 20,50</span>";
        assert_eq!(PriceScraper::prices_in_document(html), vec![10.0, 20.5]);
    }

    #[tokio::test]
    async fn test_primary_prices_settle_without_fetching_fallback() {
        let fetched = std::cell::Cell::new(false);
        let estimate = select_estimate(&[10.0, 20.5], async {
            fetched.set(true);
            Some(vec![99.0])
        })
        .await;

        assert_eq!(estimate, Some(15.25));
        assert!(!fetched.get());
    }

    #[tokio::test]
    async fn test_empty_primary_falls_back_to_secondary_mean() {
        let estimate = select_estimate(&[], async { Some(vec![10.0, 20.0]) }).await;
        assert_eq!(estimate, Some(15.0));
    }

    #[tokio::test]
    async fn test_failed_fallback_fetch_is_absent() {
        assert_eq!(select_estimate(&[], async { None }).await, None);
    }

    #[tokio::test]
    async fn test_empty_fallback_document_is_absent() {
        assert_eq!(select_estimate(&[], async { Some(Vec::new()) }).await, None);
    }

    #[tokio::test]
    async fn test_primary_request_failure_skips_fallback() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Every request to this listener answers 500.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let server_hits = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                server_hits.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let _ = stream
                    .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\n\r\n")
                    .await;
            }
        });

        let scraper = PriceScraper::new(&PriceScraperConfig {
            base_url: format!("http://{}", addr),
            ..Default::default()
        })
        .unwrap();

        let estimate = scraper
            .estimate_price("dom casmurro", "1899", "garnier")
            .await;

        assert_eq!(estimate, None);
        // The broad query was never issued.
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
