//! User accounts: credentials plus owned and favorited recipe references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{HubError, Result};
use crate::password::{hash_password, is_well_formed, verify_password};
use crate::recipe::RecipeRef;

pub const MIN_USERNAME_LEN: usize = 5;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Usernames are at least five ASCII letters or digits.
pub fn validate_username(username: &str) -> Result<()> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(HubError::Validation(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LEN
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(HubError::Validation(
            "Username may only contain letters and digits".to_string(),
        ));
    }
    Ok(())
}

/// Passwords need eight characters including a lowercase letter, an
/// uppercase letter and a digit.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(HubError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(HubError::Validation(
            "Password must contain a lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(HubError::Validation(
            "Password must contain an uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(HubError::Validation(
            "Password must contain a digit".to_string(),
        ));
    }
    Ok(())
}

pub fn is_valid_username(username: &str) -> bool {
    validate_username(username).is_ok()
}

pub fn is_valid_password(password: &str) -> bool {
    validate_password(password).is_ok()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawProfile")]
pub struct Profile {
    username: String,
    /// Plaintext, only present on a profile created or changed in this
    /// process. Never written out.
    #[serde(skip)]
    password: Option<String>,
    hashed_password: String,
    recipe_library: BTreeSet<RecipeRef>,
    favorites: BTreeSet<RecipeRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    username: String,
    hashed_password: String,
    #[serde(default)]
    recipe_library: BTreeSet<RecipeRef>,
    #[serde(default)]
    favorites: BTreeSet<RecipeRef>,
}

impl TryFrom<RawProfile> for Profile {
    type Error = HubError;

    fn try_from(raw: RawProfile) -> Result<Self> {
        validate_username(&raw.username)?;
        if !is_well_formed(&raw.hashed_password) {
            return Err(HubError::Validation(format!(
                "Stored password for {} is not a salted hash",
                raw.username
            )));
        }
        Ok(Self {
            username: raw.username,
            password: None,
            hashed_password: raw.hashed_password,
            recipe_library: raw.recipe_library,
            favorites: raw.favorites,
        })
    }
}

impl Profile {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        validate_username(&username)?;
        validate_password(&password)?;

        let hashed_password = hash_password(&password);
        Ok(Self {
            username,
            password: Some(password),
            hashed_password,
            recipe_library: BTreeSet::new(),
            favorites: BTreeSet::new(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> Result<()> {
        let username = username.into();
        validate_username(&username)?;
        self.username = username;
        Ok(())
    }

    /// The plaintext password, if this profile was not loaded from storage.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> Result<()> {
        let password = password.into();
        validate_password(&password)?;
        self.hashed_password = hash_password(&password);
        self.password = Some(password);
        Ok(())
    }

    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        verify_password(candidate, &self.hashed_password)
    }

    // Owned recipes

    pub fn recipes(&self) -> impl Iterator<Item = &RecipeRef> {
        self.recipe_library.iter()
    }

    pub fn owns(&self, recipe: &RecipeRef) -> bool {
        self.recipe_library.contains(recipe)
    }

    /// Returns false if the reference was already present.
    pub fn add_recipe(&mut self, recipe: impl Into<RecipeRef>) -> bool {
        self.recipe_library.insert(recipe.into())
    }

    pub fn remove_recipe(&mut self, recipe: impl Into<RecipeRef>) -> Result<()> {
        let recipe = recipe.into();
        if !self.recipe_library.remove(&recipe) {
            return Err(HubError::NotFound(format!(
                "{} does not own recipe {}",
                self.username, recipe
            )));
        }
        Ok(())
    }

    // Favorites

    pub fn favorites(&self) -> impl Iterator<Item = &RecipeRef> {
        self.favorites.iter()
    }

    pub fn has_favorite(&self, recipe: &RecipeRef) -> bool {
        self.favorites.contains(recipe)
    }

    pub fn add_favorite(&mut self, recipe: impl Into<RecipeRef>) -> bool {
        self.favorites.insert(recipe.into())
    }

    /// Removing a recipe that is not a favorite is a no-op; the return value
    /// says whether anything was removed.
    pub fn remove_favorite(&mut self, recipe: impl Into<RecipeRef>) -> bool {
        self.favorites.remove(&recipe.into())
    }

    /// Drop every reference (owned and favorite) to the given recipe.
    /// Returns true if the profile changed.
    pub(crate) fn forget_recipe(&mut self, recipe: &RecipeRef) -> bool {
        let owned = self.recipe_library.remove(recipe);
        let favorite = self.favorites.remove(recipe);
        owned || favorite
    }
}

/// Profiles are the same account when their usernames match.
impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for Profile {}
