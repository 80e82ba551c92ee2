//! Price enrichment API handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use acervo_core::{enrich_prices, EnrichReport};

use crate::metrics::SCRAPE_RESULTS_TOTAL;
use crate::state::AppState;

use super::{items::persist, store_error, ErrorResponse};

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub report: EnrichReport,
    pub total: usize,
}

/// POST /api/v1/prices/refresh
///
/// Run the enrichment pass over the persisted dataset and save the
/// result. Runs to completion; rows that could not be priced come back
/// with an absent price, which is not an error.
pub async fn refresh_prices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, (StatusCode, Json<ErrorResponse>)> {
    let persisted = state.dataset(true).await.map_err(store_error)?;

    let (enriched, report) =
        enrich_prices(persisted, state.price_source(), state.price_delay()).await;

    SCRAPE_RESULTS_TOTAL
        .with_label_values(&["priced"])
        .inc_by(report.priced as u64);
    SCRAPE_RESULTS_TOTAL
        .with_label_values(&["missing"])
        .inc_by(report.missing as u64);

    let saved = persist(&state, enriched, "Refresh average prices").await?.0;
    Ok(Json(RefreshResponse {
        report,
        total: saved.total,
    }))
}
