//! Prometheus metrics for observability.

use once_cell::sync::Lazy;
use prometheus::{self, Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Enrichment scrape outcomes, labeled priced/missing.
pub static SCRAPE_RESULTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("acervo_scrape_results_total", "Price scrape outcomes"),
        &["outcome"],
    )
    .unwrap()
});

/// Dataset saves, labeled ok/error.
pub static SAVES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("acervo_saves_total", "Dataset persistence attempts"),
        &["outcome"],
    )
    .unwrap()
});

/// Rows added through imports.
pub static IMPORTED_ROWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("acervo_imported_rows_total", "Rows added by bulk imports").unwrap()
});

/// Size of the last persisted dataset.
pub static DATASET_ROWS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("acervo_dataset_rows", "Rows in the last persisted dataset").unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(SCRAPE_RESULTS_TOTAL.clone()))
        .unwrap();
    registry.register(Box::new(SAVES_TOTAL.clone())).unwrap();
    registry
        .register(Box::new(IMPORTED_ROWS_TOTAL.clone()))
        .unwrap();
    registry.register(Box::new(DATASET_ROWS.clone())).unwrap();
}

/// Render the registry in Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
