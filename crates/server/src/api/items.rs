//! Item API handlers: list, lookup, add, bulk edit.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use acervo_core::{add_item, merge, CatalogError, CatalogItem, ProviderResponse};

use crate::metrics::{DATASET_ROWS, SAVES_TOTAL};
use crate::state::AppState;

use super::{store_error, ErrorResponse};

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Force a reload from the store instead of the session cache.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<CatalogItem>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub total: usize,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/items
///
/// List the catalog from the session cache.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ItemsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let items = state.dataset(params.refresh).await.map_err(store_error)?;
    let total = items.len();
    Ok(Json(ItemsResponse { items, total }))
}

/// GET /api/v1/items/lookup/{code}
///
/// Preview metadata resolution for a code without writing anything.
pub async fn lookup_metadata(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Json<ProviderResponse> {
    Json(state.resolver().resolve(code.trim()).await)
}

/// POST /api/v1/items
///
/// Add a single item. An existing item with the same identity key (and
/// kind) is a conflict: nothing is persisted and the caller gets a 409.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(mut item): Json<CatalogItem>,
) -> Result<(StatusCode, Json<SaveResponse>), (StatusCode, Json<ErrorResponse>)> {
    item.normalize_price();
    let persisted = state.dataset(true).await.map_err(store_error)?;

    let merged = match add_item(&persisted, item, state.identity_key()) {
        Ok(merged) => merged,
        Err(CatalogError::Duplicate { key }) => {
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("item already exists: {}", key),
                }),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ));
        }
    };

    persist(&state, merged, "Add item").await.map(|response| {
        (StatusCode::CREATED, response)
    })
}

/// PUT /api/v1/items
///
/// Commit a bulk edit: merge the edited rows into the persisted dataset
/// (keyed, last write wins) and save.
pub async fn update_items(
    State(state): State<Arc<AppState>>,
    Json(mut edited): Json<Vec<CatalogItem>>,
) -> Result<Json<SaveResponse>, (StatusCode, Json<ErrorResponse>)> {
    for item in &mut edited {
        item.normalize_price();
    }
    let persisted = state.dataset(true).await.map_err(store_error)?;
    let merged = merge(persisted, edited, state.identity_key());
    persist(&state, merged, "Bulk edit").await
}

/// Save a merged dataset and refresh the cache, keeping counters current.
pub(super) async fn persist(
    state: &AppState,
    items: Vec<CatalogItem>,
    message: &str,
) -> Result<Json<SaveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let total = items.len();
    match state.commit(items, message).await {
        Ok(()) => {
            SAVES_TOTAL.with_label_values(&["ok"]).inc();
            DATASET_ROWS.set(total as i64);
            Ok(Json(SaveResponse {
                total,
                message: message.to_string(),
            }))
        }
        Err(e) => {
            SAVES_TOTAL.with_label_values(&["error"]).inc();
            Err(store_error(e))
        }
    }
}
