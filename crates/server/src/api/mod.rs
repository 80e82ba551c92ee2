pub mod handlers;
pub mod import;
pub mod items;
pub mod pricing;
pub mod routes;

pub use routes::create_router;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use acervo_core::StoreError;

/// Error body shared by all handlers.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a persistence failure to a response.
///
/// Store failures get their own status class (502) so the UI can tell
/// "nothing was saved" apart from validation problems (400) and
/// conflicts (409).
pub fn store_error(e: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
