use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, import, items, pricing};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog items
        .route("/items", get(items::list_items))
        .route("/items", post(items::create_item))
        .route("/items", put(items::update_items))
        .route("/items/lookup/{code}", get(items::lookup_metadata))
        // Bulk import
        .route("/import", post(import::import_items))
        // Price enrichment
        .route("/prices/refresh", post(pricing::refresh_prices))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
}
