//! In-memory aggregate of the recipe library and all profiles.

use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};
use crate::library::RecipeLibrary;
use crate::profile::Profile;
use crate::recipe::{Recipe, RecipeRef};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeHubModel {
    #[serde(default)]
    recipe_library: RecipeLibrary,
    #[serde(default)]
    profiles: Vec<Profile>,
}

impl RecipeHubModel {
    pub fn new(recipe_library: RecipeLibrary, profiles: Vec<Profile>) -> Self {
        Self {
            recipe_library,
            profiles,
        }
    }

    pub fn recipe_library(&self) -> &RecipeLibrary {
        &self.recipe_library
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Upsert by identity. The recipe keeps its id when no other recipe
    /// holds it, then falls back to the id already stored for its identity,
    /// then to the next free id.
    pub fn save_recipe(&mut self, recipe: &Recipe) -> Recipe {
        let library = &self.recipe_library;
        let own_id = recipe.id().filter(|&id| {
            library
                .find_by_id(id)
                .map_or(true, |holder| holder.same_identity(recipe))
        });
        let stored_id = library.find(&recipe.reference()).and_then(Recipe::id);
        let id = own_id
            .or(stored_id)
            .unwrap_or_else(|| library.max_id().map_or(1, |id| id + 1));

        let mut stored = recipe.clone();
        stored.set_id(Some(id));
        self.recipe_library.put(stored.clone());
        stored
    }

    /// Remove a recipe and every profile's reference to it.
    ///
    /// Returns the usernames of the profiles that changed.
    pub fn remove_recipe(&mut self, recipe: &RecipeRef) -> Result<Vec<String>> {
        self.recipe_library.remove_ref(recipe)?;

        let mut touched = Vec::new();
        for profile in &mut self.profiles {
            if profile.forget_recipe(recipe) {
                touched.push(profile.username().to_string());
            }
        }
        Ok(touched)
    }

    pub fn profile(&self, username: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.username() == username)
    }

    /// Upsert by username.
    pub fn save_profile(&mut self, profile: &Profile) {
        match self
            .profiles
            .iter_mut()
            .find(|p| p.username() == profile.username())
        {
            Some(existing) => *existing = profile.clone(),
            None => self.profiles.push(profile.clone()),
        }
    }

    /// Add a profile whose username is not yet taken.
    pub fn register_profile(&mut self, profile: &Profile) -> Result<()> {
        if self.profile(profile.username()).is_some() {
            return Err(HubError::Duplicate(format!(
                "Username {} is taken",
                profile.username()
            )));
        }
        self.profiles.push(profile.clone());
        Ok(())
    }

    pub fn save_profiles(&mut self, profiles: &[Profile]) {
        self.profiles = profiles.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_soup() -> (RecipeHubModel, Recipe) {
        let mut model = RecipeHubModel::default();
        let soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
        model.save_recipe(&soup);
        (model, soup)
    }

    #[test]
    fn test_save_recipe_assigns_and_keeps_ids() {
        let (mut model, soup) = model_with_soup();
        assert_eq!(model.recipe_library().get(0).unwrap().id(), Some(1));

        let bread = Recipe::new("Bread", 1, "Chef12345").unwrap();
        assert_eq!(model.save_recipe(&bread).id(), Some(2));

        let mut edited = soup.clone();
        edited.set_description("thicker");
        let stored = model.save_recipe(&edited);
        assert_eq!(stored.id(), Some(1));
        assert_eq!(model.recipe_library().len(), 2);
        assert_eq!(model.recipe_library().get(0).unwrap().description(), "thicker");
    }

    #[test]
    fn test_renamed_recipe_gets_a_fresh_id() {
        let (mut model, _) = model_with_soup();
        let mut stew = model.recipe_library().get(0).unwrap().clone();
        stew.set_name("Stew").unwrap();
        assert_eq!(stew.id(), Some(1));

        assert_eq!(model.save_recipe(&stew).id(), Some(2));
        let library = model.recipe_library();
        assert_eq!(library.find_by_id(1).unwrap().name(), "Soup");
        assert_eq!(library.find_by_id(2).unwrap().name(), "Stew");
    }

    #[test]
    fn test_free_incoming_id_is_kept() {
        let (mut model, _) = model_with_soup();
        let mut bread = Recipe::new("Bread", 1, "Chef12345").unwrap();
        bread.set_id(Some(10));
        assert_eq!(model.save_recipe(&bread).id(), Some(10));
        assert_eq!(model.recipe_library().find_by_id(10).unwrap().name(), "Bread");
    }

    #[test]
    fn test_remove_cascades_to_favorites() {
        let (mut model, soup) = model_with_soup();
        let mut owner = Profile::new("Chef12345", "Secret123").unwrap();
        owner.add_recipe(&soup);
        let mut fan_a = Profile::new("FanNumber1", "Secret123").unwrap();
        fan_a.add_favorite(&soup);
        let mut fan_b = Profile::new("FanNumber2", "Secret123").unwrap();
        fan_b.add_favorite(&soup);
        let bystander = Profile::new("Bystander1", "Secret123").unwrap();
        model.save_profiles(&[owner, fan_a, fan_b, bystander]);

        let touched = model.remove_recipe(&soup.reference()).unwrap();
        assert_eq!(touched, ["Chef12345", "FanNumber1", "FanNumber2"]);
        assert!(model.recipe_library().is_empty());
        for profile in model.profiles() {
            assert!(!profile.has_favorite(&soup.reference()));
            assert!(!profile.owns(&soup.reference()));
        }
    }

    #[test]
    fn test_remove_unknown_recipe() {
        let mut model = RecipeHubModel::default();
        let missing = RecipeRef::new("Soup", "Chef12345");
        assert!(matches!(
            model.remove_recipe(&missing),
            Err(HubError::NotFound(_))
        ));
    }

    #[test]
    fn test_profiles_upsert_and_register() {
        let mut model = RecipeHubModel::default();
        let profile = Profile::new("Chef12345", "Secret123").unwrap();
        model.register_profile(&profile).unwrap();
        assert!(matches!(
            model.register_profile(&profile),
            Err(HubError::Duplicate(_))
        ));

        let mut changed = profile.clone();
        changed.add_favorite(RecipeRef::new("Soup", "Other1234"));
        model.save_profile(&changed);
        assert_eq!(model.profiles().len(), 1);
        assert_eq!(model.profile("Chef12345").unwrap().favorites().count(), 1);
    }
}
