//! Storage access for recipes and profiles.
//!
//! Callers hold a `dyn RecipeHubAccess` and never know whether it is backed
//! by local JSON files, a remote RecipeHub server, or memory.
//!
//! Reads return `Result` so a failed fetch can be told apart from an empty
//! store. Writes return a plain `bool`: a failed write is logged and reported
//! as `false` so the caller's flow carries on.

mod local;
mod memory;
mod remote;

pub use local::{LocalAccess, LocalAccessBuilder, DEFAULT_PROFILES_FILE, DEFAULT_RECIPES_FILE};
pub use memory::InMemoryAccess;
pub use remote::{RemoteAccess, RemoteAccessBuilder, API_PREFIX};

use async_trait::async_trait;

use crate::error::{HubError, Result};
use crate::library::RecipeLibrary;
use crate::profile::Profile;
use crate::recipe::Recipe;

#[async_trait]
pub trait RecipeHubAccess: Send + Sync {
    /// All stored recipes.
    async fn recipe_library(&self) -> Result<RecipeLibrary>;

    /// Store a recipe, replacing any stored recipe with the same identity.
    async fn save_recipe(&self, recipe: &Recipe) -> bool;

    /// Remove a recipe and every profile's reference to it. False if the
    /// recipe was not stored.
    async fn remove_recipe(&self, recipe: &Recipe) -> bool;

    /// Store a profile, replacing any stored profile with the same username.
    async fn save_profile(&self, profile: &Profile) -> bool;

    async fn profiles(&self) -> Result<Vec<Profile>>;

    async fn load_profile(&self, username: &str) -> Result<Option<Profile>>;

    async fn save_profiles(&self, profiles: &[Profile]) -> bool;

    /// First stored profile matching the predicate.
    async fn find_profile(
        &self,
        predicate: &(dyn for<'p> Fn(&'p Profile) -> bool + Send + Sync),
    ) -> Result<Option<Profile>> {
        Ok(self.profiles().await?.into_iter().find(|p| predicate(p)))
    }

    /// The stored profile if the username exists and the password matches.
    /// An unknown user and a wrong password both give `None`.
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Profile>> {
        let profile = self.load_profile(username).await?;
        Ok(profile.filter(|p| p.verify_password(password)))
    }

    /// Save a new profile, failing if the username is already taken.
    async fn register_profile(&self, profile: &Profile) -> Result<bool> {
        if self.load_profile(profile.username()).await?.is_some() {
            return Err(HubError::Duplicate(format!(
                "Username {} is taken",
                profile.username()
            )));
        }
        Ok(self.save_profile(profile).await)
    }

    /// Look up the profile that wrote a recipe.
    async fn author_of(&self, recipe: &Recipe) -> Result<Option<Profile>> {
        self.load_profile(recipe.author()).await
    }
}

/// Which backend to construct.
#[derive(Debug, Clone)]
pub enum AccessConfig {
    Local(LocalAccessBuilder),
    Remote(RemoteAccessBuilder),
    Memory,
}

impl AccessConfig {
    /// Read the backend choice from the environment.
    ///
    /// - `RECIPEHUB_BACKEND`: "local" (default) | "remote" | "memory"
    ///
    /// Each backend's builder reads its own variables.
    pub fn from_env() -> Result<Self> {
        let backend = std::env::var("RECIPEHUB_BACKEND").unwrap_or_else(|_| "local".to_string());

        match backend.as_str() {
            "local" => Ok(AccessConfig::Local(LocalAccessBuilder::new())),
            "remote" => Ok(AccessConfig::Remote(RemoteAccessBuilder::new())),
            "memory" => Ok(AccessConfig::Memory),
            other => Err(HubError::Argument(format!("Unknown backend: {}", other))),
        }
    }

    pub fn connect(self) -> Result<Box<dyn RecipeHubAccess>> {
        match self {
            AccessConfig::Local(builder) => {
                let access = builder.build();
                tracing::debug!(
                    recipes = %access.recipes_path().display(),
                    profiles = %access.profiles_path().display(),
                    "using local store"
                );
                Ok(Box::new(access))
            }
            AccessConfig::Remote(builder) => {
                let access = builder.build()?;
                tracing::debug!(api = %access.api_root(), "using remote store");
                Ok(Box::new(access))
            }
            AccessConfig::Memory => {
                tracing::debug!("using in-memory store");
                Ok(Box::new(InMemoryAccess::new()))
            }
        }
    }
}
