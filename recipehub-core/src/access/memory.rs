//! In-memory store for tests and ephemeral servers.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::RecipeHubAccess;
use crate::error::Result;
use crate::library::RecipeLibrary;
use crate::model::RecipeHubModel;
use crate::profile::Profile;
use crate::recipe::Recipe;

/// A `RecipeHubModel` behind a mutex. Nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryAccess {
    model: Mutex<RecipeHubModel>,
}

impl InMemoryAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: RecipeHubModel) -> Self {
        Self {
            model: Mutex::new(model),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> RecipeHubModel {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, RecipeHubModel> {
        // No operation below leaves the model half-written.
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecipeHubAccess for InMemoryAccess {
    async fn recipe_library(&self) -> Result<RecipeLibrary> {
        Ok(self.lock().recipe_library().clone())
    }

    async fn save_recipe(&self, recipe: &Recipe) -> bool {
        self.lock().save_recipe(recipe);
        true
    }

    async fn remove_recipe(&self, recipe: &Recipe) -> bool {
        match self.lock().remove_recipe(&recipe.reference()) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "remove skipped");
                false
            }
        }
    }

    async fn save_profile(&self, profile: &Profile) -> bool {
        self.lock().save_profile(profile);
        true
    }

    async fn profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.lock().profiles().to_vec())
    }

    async fn load_profile(&self, username: &str) -> Result<Option<Profile>> {
        Ok(self.lock().profile(username).cloned())
    }

    async fn save_profiles(&self, profiles: &[Profile]) -> bool {
        self.lock().save_profiles(profiles);
        true
    }
}
