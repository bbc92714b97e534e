pub mod api;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::Router;
use recipehub_core::RecipeHubAccess;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Application state shared across all handlers
pub type AppState = Arc<dyn RecipeHubAccess>;

/// Build the full application around a store.
pub fn app(access: AppState) -> Router {
    api::router().with_state(access).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str)
                    .unwrap_or(request.uri().path());

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %matched_path,
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &Span| {
                    let status = response.status().as_u16();
                    if status >= 500 {
                        tracing::error!(
                            status = %status,
                            latency_ms = %latency.as_millis(),
                            "request failed with server error"
                        );
                    } else {
                        tracing::info!(
                            status = %status,
                            latency_ms = %latency.as_millis(),
                            "request completed"
                        );
                    }
                },
            ),
    )
}
