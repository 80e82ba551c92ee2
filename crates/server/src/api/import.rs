//! Bulk import API handler.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;

use acervo_core::{import_spreadsheet, merge, ImportError};

use crate::metrics::IMPORTED_ROWS_TOTAL;
use crate::state::AppState;

use super::{items::persist, store_error, ErrorResponse};

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub added: usize,
    pub skipped_existing: usize,
    pub total: usize,
}

/// POST /api/v1/import
///
/// Body is a CSV spreadsheet export with at least an `identifier` column.
/// Schema errors abort with 400 before anything is resolved or written.
pub async fn import_items(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ImportResponse>, (StatusCode, Json<ErrorResponse>)> {
    let persisted = state.dataset(true).await.map_err(store_error)?;

    let (new_rows, outcome) = import_spreadsheet(
        &body,
        &persisted,
        state.resolver(),
        state.identity_key(),
    )
    .await
    .map_err(|e| {
        let status = match e {
            ImportError::MissingColumn(_) | ImportError::Csv(_) => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    if new_rows.is_empty() {
        // Nothing new; avoid an empty commit.
        return Ok(Json(ImportResponse {
            added: 0,
            skipped_existing: outcome.skipped_existing,
            total: persisted.len(),
        }));
    }

    let merged = merge(persisted, new_rows, state.identity_key());
    let saved = persist(&state, merged, "Bulk import").await?.0;

    IMPORTED_ROWS_TOTAL.inc_by(outcome.added as u64);
    Ok(Json(ImportResponse {
        added: outcome.added,
        skipped_existing: outcome.skipped_existing,
        total: saved.total,
    }))
}
