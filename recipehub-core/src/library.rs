//! Ordered recipe collection keyed by (name, author).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{HubError, Result};
use crate::recipe::{Recipe, RecipeRef};

/// Recipes in insertion order, at most one per (name, author) pair.
///
/// Serializes as `{"recipes": [...]}`. A document listing one identity
/// twice is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLibrary")]
pub struct RecipeLibrary {
    recipes: Vec<Recipe>,
}

#[derive(Deserialize)]
struct RawLibrary {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

impl TryFrom<RawLibrary> for RecipeLibrary {
    type Error = HubError;

    fn try_from(raw: RawLibrary) -> Result<Self> {
        let mut library = RecipeLibrary::new();
        for recipe in raw.recipes {
            library.add(recipe)?;
        }
        Ok(library)
    }
}

impl RecipeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipe, rejecting one whose identity is already present.
    pub fn add(&mut self, recipe: Recipe) -> Result<()> {
        if self.contains(&recipe) {
            return Err(HubError::Duplicate(format!(
                "Recipe {}",
                recipe.reference()
            )));
        }
        self.recipes.push(recipe);
        Ok(())
    }

    /// Replace the entry sharing the recipe's identity, or append it.
    /// Returns the replaced entry.
    pub fn put(&mut self, recipe: Recipe) -> Option<Recipe> {
        match self.position(&recipe.reference()) {
            Some(i) => Some(std::mem::replace(&mut self.recipes[i], recipe)),
            None => {
                self.recipes.push(recipe);
                None
            }
        }
    }

    pub fn remove(&mut self, recipe: &Recipe) -> Result<Recipe> {
        self.remove_ref(&recipe.reference())
    }

    pub fn remove_ref(&mut self, reference: &RecipeRef) -> Result<Recipe> {
        match self.position(reference) {
            Some(i) => Ok(self.recipes.remove(i)),
            None => Err(HubError::NotFound(format!("Recipe {}", reference))),
        }
    }

    pub fn contains(&self, recipe: &Recipe) -> bool {
        self.position(&recipe.reference()).is_some()
    }

    pub fn find(&self, reference: &RecipeRef) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.matches(reference))
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id() == Some(id))
    }

    pub fn get(&self, index: usize) -> Result<&Recipe> {
        self.recipes.get(index).ok_or(HubError::Index {
            index,
            len: self.recipes.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    /// A copy of the entries; changes to it do not touch the library.
    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Recipe, &Recipe) -> Ordering,
    {
        self.recipes.sort_by(compare);
    }

    /// New library holding the matching entries, order kept.
    pub fn filter<P>(&self, mut predicate: P) -> RecipeLibrary
    where
        P: FnMut(&Recipe) -> bool,
    {
        RecipeLibrary {
            recipes: self.recipes.iter().filter(|&r| predicate(r)).cloned().collect(),
        }
    }

    pub fn by_author(&self, username: &str) -> RecipeLibrary {
        self.filter(|r| r.author() == username)
    }

    pub fn saved(&self) -> RecipeLibrary {
        self.filter(Recipe::is_saved)
    }

    /// Largest id in use, if any entry has one.
    pub fn max_id(&self) -> Option<u64> {
        self.recipes.iter().filter_map(Recipe::id).max()
    }

    fn position(&self, reference: &RecipeRef) -> Option<usize> {
        self.recipes.iter().position(|r| r.matches(reference))
    }
}

impl<'a> IntoIterator for &'a RecipeLibrary {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

impl FromIterator<Recipe> for RecipeLibrary {
    /// Later recipes overwrite earlier ones sharing an identity.
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        let mut library = RecipeLibrary::new();
        for recipe in iter {
            library.put(recipe);
        }
        library
    }
}
