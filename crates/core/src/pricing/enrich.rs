//! Average-price enrichment pass over a dataset.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{dedup_exact, CatalogItem};

use super::PriceSource;

/// Outcome counts for one enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    /// Rows that received a scraped price.
    pub priced: usize,
    /// Rows scraped without finding any price (stored as absent).
    pub missing: usize,
    /// Rows skipped because their price is human-verified.
    pub verified_skipped: usize,
}

/// Re-price every unverified row of the dataset.
///
/// Rows flagged as price-verified are passed through byte-identical. All
/// other rows get `average_price` assigned from the source - `None` when
/// the scrape finds nothing, so an unknown price is never stored as zero.
/// Scrapes run strictly one at a time with a fixed sleep between
/// successive requests. A failure on one row only affects that row.
///
/// The pass never drops rows or columns; it finishes by removing
/// exact-duplicate rows accumulated across repeated runs.
pub async fn enrich_prices(
    items: Vec<CatalogItem>,
    source: &dyn PriceSource,
    delay: Duration,
) -> (Vec<CatalogItem>, EnrichReport) {
    let total = items.len();
    let mut report = EnrichReport::default();
    let mut enriched = Vec::with_capacity(total);
    let mut scraped_any = false;

    for mut item in items {
        if item.is_price_verified() {
            report.verified_skipped += 1;
            enriched.push(item);
            continue;
        }

        // Fixed inter-request delay between successive scrapes.
        if scraped_any {
            tokio::time::sleep(delay).await;
        }
        scraped_any = true;

        let title = item.title.clone().unwrap_or_default();
        let year = item.year.clone().unwrap_or_default();
        let publisher = item.publisher.clone().unwrap_or_default();

        match source.estimate_price(&title, &year, &publisher).await {
            Some(price) => {
                debug!(title, price, "row priced");
                item.average_price = Some(price);
                report.priced += 1;
            }
            None => {
                debug!(title, "no price for row");
                item.average_price = None;
                report.missing += 1;
            }
        }
        enriched.push(item);
    }

    info!(
        total,
        priced = report.priced,
        missing = report.missing,
        verified_skipped = report.verified_skipped,
        "enrichment pass finished"
    );

    (dedup_exact(enriched), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PriceFlag;
    use crate::testing::MockPriceSource;

    fn item(id: &str, title: &str) -> CatalogItem {
        CatalogItem {
            identifier: id.to_string(),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_verified_rows_are_untouched() {
        let mut verified = item("1", "Dom Casmurro");
        verified.price_verified = PriceFlag::Yes;
        verified.average_price = Some(99.9);
        let unverified = item("2", "Iracema");

        let source = MockPriceSource::new().with_price("Iracema", 12.5);
        let (enriched, report) = enrich_prices(
            vec![verified.clone(), unverified],
            &source,
            Duration::ZERO,
        )
        .await;

        assert_eq!(enriched[0], verified);
        assert_eq!(enriched[1].average_price, Some(12.5));
        assert_eq!(report.priced, 1);
        assert_eq!(report.verified_skipped, 1);

        // The verified row was never scraped.
        let calls = source.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Iracema");
    }

    #[tokio::test]
    async fn test_missing_price_is_absent_not_zero() {
        let mut stale = item("1", "Quincas Borba");
        stale.average_price = Some(4.0);

        let source = MockPriceSource::new();
        let (enriched, report) = enrich_prices(vec![stale], &source, Duration::ZERO).await;

        assert_eq!(enriched[0].average_price, None);
        assert_eq!(report.missing, 1);
        assert_eq!(report.priced, 0);
    }

    #[tokio::test]
    async fn test_single_row_failure_does_not_abort_pass() {
        let source = MockPriceSource::new().with_price("B", 8.0);
        let (enriched, report) = enrich_prices(
            vec![item("1", "A"), item("2", "B")],
            &source,
            Duration::ZERO,
        )
        .await;

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].average_price, None);
        assert_eq!(enriched[1].average_price, Some(8.0));
        assert_eq!(report.priced, 1);
        assert_eq!(report.missing, 1);
    }

    #[tokio::test]
    async fn test_repeated_runs_do_not_accumulate_duplicates() {
        let source = MockPriceSource::new().with_price("A", 5.0);
        let items = vec![item("1", "A"), item("1", "A")];

        let (first, _) = enrich_prices(items, &source, Duration::ZERO).await;
        assert_eq!(first.len(), 1);

        let (second, _) = enrich_prices(first.clone(), &source, Duration::ZERO).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_columns_survive_enrichment() {
        let mut row = item("1", "A");
        row.extra.insert("shelf".to_string(), "B2".to_string());

        let source = MockPriceSource::new().with_price("A", 5.0);
        let (enriched, _) = enrich_prices(vec![row], &source, Duration::ZERO).await;

        assert_eq!(enriched[0].extra.get("shelf").map(String::as_str), Some("B2"));
    }
}
