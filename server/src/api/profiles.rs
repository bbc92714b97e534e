use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use recipehub_core::Profile;

use crate::api::ErrorResponse;
use crate::AppState;

/// Returns the router for profiles
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipehub/profiles", get(list_profiles).put(save_profile))
        .route("/recipehub/profiles/{username}", get(get_profile))
}

pub async fn list_profiles(State(access): State<AppState>) -> impl IntoResponse {
    match access.profiles().await {
        Ok(profiles) => Json(profiles).into_response(),
        Err(e) => ErrorResponse::store_failure(e),
    }
}

pub async fn get_profile(
    State(access): State<AppState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    match access.load_profile(&username).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Profile {} not found", username),
            }),
        )
            .into_response(),
        Err(e) => ErrorResponse::store_failure(e),
    }
}

/// Insert or replace a profile by username.
pub async fn save_profile(
    State(access): State<AppState>,
    Json(profile): Json<Profile>,
) -> Json<bool> {
    let saved = access.save_profile(&profile).await;
    tracing::info!(username = profile.username(), saved, "save profile");
    Json(saved)
}
