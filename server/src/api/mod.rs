pub mod profiles;
pub mod recipe_library;

use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use recipehub_core::HubError;
use serde::Serialize;

use crate::AppState;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Response for a failed read from the backing store.
    pub fn store_failure(e: HubError) -> axum::response::Response {
        tracing::error!(error = %e, "store read failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response()
    }
}

/// Returns the router for all resources, under /recipehub
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(recipe_library::router())
        .merge(profiles::router())
}
