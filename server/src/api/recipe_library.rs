use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use recipehub_core::Recipe;

use crate::api::ErrorResponse;
use crate::AppState;

/// Returns the router for the recipe library
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/recipehub/recipelibrary",
        get(get_recipe_library)
            .put(save_recipe)
            .delete(remove_recipe),
    )
}

pub async fn get_recipe_library(State(access): State<AppState>) -> impl IntoResponse {
    match access.recipe_library().await {
        Ok(library) => Json(library).into_response(),
        Err(e) => ErrorResponse::store_failure(e),
    }
}

/// Insert or replace a recipe by (name, author).
pub async fn save_recipe(
    State(access): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> Json<bool> {
    let saved = access.save_recipe(&recipe).await;
    tracing::info!(recipe = %recipe.reference(), saved, "save recipe");
    Json(saved)
}

/// Remove a recipe; profiles referencing it are updated by the store.
pub async fn remove_recipe(
    State(access): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> Json<bool> {
    let removed = access.remove_recipe(&recipe).await;
    tracing::info!(recipe = %recipe.reference(), removed, "remove recipe");
    Json(removed)
}
