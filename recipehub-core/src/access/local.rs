//! JSON file store: one document per collection.
//!
//! Every write reads the whole collection, changes it in memory and writes
//! the whole file back. There is no locking, so two processes writing at the
//! same time can lose an update.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::RecipeHubAccess;
use crate::error::Result;
use crate::library::RecipeLibrary;
use crate::model::RecipeHubModel;
use crate::profile::Profile;
use crate::recipe::Recipe;

pub const DEFAULT_RECIPES_FILE: &str = "recipehub-recipes.json";
pub const DEFAULT_PROFILES_FILE: &str = "recipehub-profiles.json";

/// Configuration for LocalAccess.
#[derive(Debug, Clone)]
pub struct LocalAccessBuilder {
    data_dir: PathBuf,
    recipes_file: String,
    profiles_file: String,
}

impl Default for LocalAccessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalAccessBuilder {
    /// Create a builder with default settings.
    ///
    /// Environment variables:
    /// - `RECIPEHUB_DATA_DIR`: directory holding the files (default: home directory)
    /// - `RECIPEHUB_RECIPES_FILE`: recipe collection file name
    /// - `RECIPEHUB_PROFILES_FILE`: profile collection file name
    pub fn new() -> Self {
        let data_dir = std::env::var("RECIPEHUB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| LocalAccess::default_dir());

        let recipes_file = std::env::var("RECIPEHUB_RECIPES_FILE")
            .unwrap_or_else(|_| DEFAULT_RECIPES_FILE.to_string());

        let profiles_file = std::env::var("RECIPEHUB_PROFILES_FILE")
            .unwrap_or_else(|_| DEFAULT_PROFILES_FILE.to_string());

        Self {
            data_dir,
            recipes_file,
            profiles_file,
        }
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn recipes_file(mut self, name: impl Into<String>) -> Self {
        self.recipes_file = name.into();
        self
    }

    pub fn profiles_file(mut self, name: impl Into<String>) -> Self {
        self.profiles_file = name.into();
        self
    }

    pub fn build(self) -> LocalAccess {
        LocalAccess {
            recipes_path: self.data_dir.join(self.recipes_file),
            profiles_path: self.data_dir.join(self.profiles_file),
        }
    }
}

pub struct LocalAccess {
    recipes_path: PathBuf,
    profiles_path: PathBuf,
}

impl LocalAccess {
    /// Store in `data_dir` with the default file names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            recipes_path: data_dir.join(DEFAULT_RECIPES_FILE),
            profiles_path: data_dir.join(DEFAULT_PROFILES_FILE),
        }
    }

    pub fn builder() -> LocalAccessBuilder {
        LocalAccessBuilder::new()
    }

    /// The user's home directory, or the working directory if it is unknown.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn recipes_path(&self) -> &Path {
        &self.recipes_path
    }

    pub fn profiles_path(&self) -> &Path {
        &self.profiles_path
    }

    fn read_library(&self) -> Option<RecipeLibrary> {
        read_document(&self.recipes_path)
    }

    fn read_profiles(&self) -> Option<Vec<Profile>> {
        read_document(&self.profiles_path)
    }

    fn write_library(&self, library: &RecipeLibrary) -> bool {
        write_logged(&self.recipes_path, library)
    }

    fn write_profiles(&self, profiles: &[Profile]) -> bool {
        write_logged(&self.profiles_path, &profiles)
    }
}

#[async_trait]
impl RecipeHubAccess for LocalAccess {
    async fn recipe_library(&self) -> Result<RecipeLibrary> {
        Ok(self.read_library().unwrap_or_default())
    }

    async fn save_recipe(&self, recipe: &Recipe) -> bool {
        let Some(library) = self.read_library() else {
            return refuse_overwrite(&self.recipes_path);
        };
        // Profiles are not touched by a recipe save.
        let mut model = RecipeHubModel::new(library, Vec::new());
        model.save_recipe(recipe);
        self.write_library(model.recipe_library())
    }

    async fn remove_recipe(&self, recipe: &Recipe) -> bool {
        let Some(library) = self.read_library() else {
            return refuse_overwrite(&self.recipes_path);
        };
        let Some(profiles) = self.read_profiles() else {
            return refuse_overwrite(&self.profiles_path);
        };

        let mut model = RecipeHubModel::new(library, profiles);
        let touched = match model.remove_recipe(&recipe.reference()) {
            Ok(touched) => touched,
            Err(e) => {
                tracing::debug!(error = %e, "remove skipped");
                return false;
            }
        };

        if !self.write_library(model.recipe_library()) {
            return false;
        }
        if touched.is_empty() {
            return true;
        }
        tracing::debug!(profiles = ?touched, "dropping references to removed recipe");
        self.write_profiles(model.profiles())
    }

    async fn save_profile(&self, profile: &Profile) -> bool {
        let Some(profiles) = self.read_profiles() else {
            return refuse_overwrite(&self.profiles_path);
        };
        let mut model = RecipeHubModel::new(RecipeLibrary::new(), profiles);
        model.save_profile(profile);
        self.write_profiles(model.profiles())
    }

    async fn profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.read_profiles().unwrap_or_default())
    }

    async fn load_profile(&self, username: &str) -> Result<Option<Profile>> {
        Ok(self
            .read_profiles()
            .unwrap_or_default()
            .into_iter()
            .find(|p| p.username() == username))
    }

    /// Replaces the whole collection, so an unreadable file is overwritten.
    async fn save_profiles(&self, profiles: &[Profile]) -> bool {
        self.write_profiles(profiles)
    }
}

/// Read a JSON document. A missing file is a first run and yields the
/// default. Unreadable or corrupt files are logged and yield `None`; callers
/// reading treat that as empty, callers writing must not overwrite it.
fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "store file missing, starting empty");
            return Some(T::default());
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read store file");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse store file");
            None
        }
    }
}

fn refuse_overwrite(path: &Path) -> bool {
    tracing::warn!(path = %path.display(), "store file unreadable, not overwriting it");
    false
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

    fs::write(path, json)
}

fn write_logged<T: Serialize + ?Sized>(path: &Path, value: &T) -> bool {
    match write_json(path, value) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "store file written");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to write store file");
            false
        }
    }
}
