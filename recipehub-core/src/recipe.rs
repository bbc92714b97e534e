//! Recipes, their ingredients, steps and reviews.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HubError, Result};
use crate::review::Review;
use crate::unit::Unit;

/// Identity of a recipe: its name together with its author's username.
///
/// Profiles hold these instead of recipe copies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRef {
    pub name: String,
    pub author_username: String,
}

impl RecipeRef {
    pub fn new(name: impl Into<String>, author_username: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author_username: author_username.into(),
        }
    }
}

impl fmt::Display for RecipeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} by {}", self.name, self.author_username)
    }
}

impl From<&Recipe> for RecipeRef {
    fn from(recipe: &Recipe) -> Self {
        recipe.reference()
    }
}

/// A recipe. Deserialized recipes go through the same checks as ones built
/// with `Recipe::new` and the mutators below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRecipe")]
pub struct Recipe {
    name: String,
    portions: u32,
    description: String,
    steps: Vec<String>,
    ingredients: BTreeMap<String, f64>,
    ingredient_units: BTreeMap<String, Unit>,
    author_username: String,
    is_saved: bool,
    review_list: Vec<Review>,
    id: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecipe {
    name: String,
    portions: u32,
    #[serde(default)]
    description: String,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    ingredients: BTreeMap<String, f64>,
    #[serde(default)]
    ingredient_units: BTreeMap<String, Unit>,
    author_username: String,
    #[serde(default)]
    is_saved: bool,
    #[serde(default)]
    review_list: Vec<Review>,
    #[serde(default)]
    id: Option<u64>,
}

impl TryFrom<RawRecipe> for Recipe {
    type Error = HubError;

    fn try_from(raw: RawRecipe) -> Result<Self> {
        let mut recipe = Recipe::new(raw.name, raw.portions, raw.author_username)?;
        recipe.description = raw.description;
        recipe.steps = raw.steps;
        recipe.is_saved = raw.is_saved;
        recipe.id = raw.id;

        let mut units = raw.ingredient_units;
        for (name, amount) in raw.ingredients {
            let unit = units.remove(&name).ok_or_else(|| {
                HubError::Argument(format!("Ingredient {:?} has no unit", name))
            })?;
            recipe.add_ingredient(&name, amount, unit)?;
        }
        if let Some(name) = units.keys().next() {
            return Err(HubError::Argument(format!(
                "Unit given for unknown ingredient {:?}",
                name
            )));
        }

        for review in raw.review_list {
            recipe.add_review(review)?;
        }
        Ok(recipe)
    }
}

impl Recipe {
    pub fn new(name: impl Into<String>, portions: u32, author: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        validate_portions(portions)?;

        Ok(Self {
            name,
            portions,
            description: String::new(),
            steps: Vec::new(),
            ingredients: BTreeMap::new(),
            ingredient_units: BTreeMap::new(),
            author_username: author.into(),
            is_saved: false,
            review_list: Vec::new(),
            id: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn portions(&self) -> u32 {
        self.portions
    }

    pub fn set_portions(&mut self, portions: u32) -> Result<()> {
        validate_portions(portions)?;
        self.portions = portions;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Username of the author. Resolve it with `RecipeHubAccess::author_of`.
    pub fn author(&self) -> &str {
        &self.author_username
    }

    pub fn is_saved(&self) -> bool {
        self.is_saved
    }

    pub fn set_saved(&mut self, saved: bool) {
        self.is_saved = saved;
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<u64>) {
        self.id = id;
    }

    pub fn reference(&self) -> RecipeRef {
        RecipeRef::new(&self.name, &self.author_username)
    }

    /// Same (name, author) pair. Ids and contents are ignored.
    pub fn same_identity(&self, other: &Recipe) -> bool {
        self.matches(&other.reference())
    }

    pub fn matches(&self, reference: &RecipeRef) -> bool {
        self.name == reference.name && self.author_username == reference.author_username
    }

    // Steps

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn add_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    /// Insert a step before `index`; `index == len` appends.
    pub fn insert_step(&mut self, index: usize, step: impl Into<String>) -> Result<()> {
        if index > self.steps.len() {
            return Err(HubError::Index {
                index,
                len: self.steps.len(),
            });
        }
        self.steps.insert(index, step.into());
        Ok(())
    }

    pub fn remove_step(&mut self, index: usize) -> Result<String> {
        if index >= self.steps.len() {
            return Err(HubError::Index {
                index,
                len: self.steps.len(),
            });
        }
        Ok(self.steps.remove(index))
    }

    // Ingredients

    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.keys().map(String::as_str)
    }

    pub fn ingredient_amount(&self, name: &str) -> Option<f64> {
        self.ingredients.get(name).copied()
    }

    pub fn ingredient_unit(&self, name: &str) -> Option<Unit> {
        self.ingredient_units.get(name).copied()
    }

    pub fn has_ingredient(&self, name: &str) -> bool {
        self.ingredients.contains_key(name)
    }

    /// Add `amount` of an ingredient. Repeated adds accumulate, but only in
    /// the unit the ingredient was first recorded with.
    pub fn add_ingredient(&mut self, name: &str, amount: f64, unit: Unit) -> Result<()> {
        check_amount(amount)?;
        if name.trim().is_empty() {
            return Err(HubError::Argument(
                "Ingredient name must not be empty".to_string(),
            ));
        }

        match self.ingredients.get_mut(name) {
            Some(current) => {
                let recorded = self.ingredient_units.get(name).copied();
                if recorded != Some(unit) {
                    return Err(HubError::Argument(format!(
                        "Ingredient {:?} is measured in {}, not {}",
                        name,
                        recorded.map(|u| u.as_str()).unwrap_or("no unit"),
                        unit
                    )));
                }
                *current += amount;
            }
            None => {
                self.ingredients.insert(name.to_string(), amount);
                self.ingredient_units.insert(name.to_string(), unit);
            }
        }
        Ok(())
    }

    /// Take `amount` away from an ingredient. The ingredient stays listed
    /// even when its amount reaches zero.
    pub fn remove_ingredient_amount(&mut self, name: &str, amount: f64) -> Result<()> {
        if amount.is_nan() || amount < 0.0 {
            return Err(HubError::Argument(format!(
                "Amount to remove must not be negative, got {}",
                amount
            )));
        }
        let Some(current) = self.ingredients.get_mut(name) else {
            return Err(HubError::Argument(format!(
                "Cannot remove from unknown ingredient {:?}",
                name
            )));
        };
        if amount > *current {
            return Err(HubError::Argument(format!(
                "Cannot remove {} of {:?}, only {} present",
                amount, name, current
            )));
        }
        *current -= amount;
        Ok(())
    }

    pub fn remove_ingredient(&mut self, name: &str) -> Result<()> {
        if self.ingredients.remove(name).is_none() {
            return Err(HubError::NotFound(format!("Ingredient {:?}", name)));
        }
        self.ingredient_units.remove(name);
        Ok(())
    }

    /// Change the unit an existing ingredient is recorded in. The amount is
    /// kept as is.
    pub fn set_ingredient_unit(&mut self, name: &str, unit: Unit) -> Result<()> {
        if !self.ingredients.contains_key(name) {
            return Err(HubError::NotFound(format!("Ingredient {:?}", name)));
        }
        self.ingredient_units.insert(name.to_string(), unit);
        Ok(())
    }

    /// Copy of this recipe with every amount scaled to serve `portions`.
    pub fn scale_to_portions(&self, portions: u32) -> Result<Recipe> {
        validate_portions(portions)?;
        let factor = f64::from(portions) / f64::from(self.portions);

        let mut scaled = self.clone();
        for amount in scaled.ingredients.values_mut() {
            *amount *= factor;
        }
        scaled.portions = portions;
        Ok(scaled)
    }

    // Reviews

    pub fn reviews(&self) -> &[Review] {
        &self.review_list
    }

    pub fn has_reviewed(&self, username: &str) -> bool {
        self.review_list.iter().any(|r| r.reviewer() == username)
    }

    pub fn add_review(&mut self, review: Review) -> Result<()> {
        if self.has_reviewed(review.reviewer()) {
            return Err(HubError::Duplicate(format!(
                "{} has already reviewed {:?}",
                review.reviewer(),
                self.name
            )));
        }
        self.review_list.push(review);
        Ok(())
    }

    /// Mean rating rounded to one decimal place, or 0.0 without reviews.
    pub fn average_rating(&self) -> f64 {
        if self.review_list.is_empty() {
            return 0.0;
        }
        let total: f64 = self.review_list.iter().map(Review::rating).sum();
        let mean = total / self.review_list.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    pub fn number_of_reviewers(&self) -> usize {
        self.review_list.len()
    }

    pub fn number_of_comments(&self) -> usize {
        self.review_list.iter().filter(|r| r.has_comment()).count()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HubError::Validation(
            "Recipe name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_portions(portions: u32) -> Result<()> {
    if portions < 1 {
        return Err(HubError::Validation(
            "A recipe must serve at least one portion".to_string(),
        ));
    }
    Ok(())
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(HubError::Argument(format!(
            "Amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup() -> Recipe {
        Recipe::new("Soup", 4, "Chef12345").unwrap()
    }

    #[test]
    fn test_new_validates() {
        assert!(matches!(
            Recipe::new("  ", 4, "Chef12345"),
            Err(HubError::Validation(_))
        ));
        assert!(matches!(
            Recipe::new("Soup", 0, "Chef12345"),
            Err(HubError::Validation(_))
        ));
    }

    #[test]
    fn test_ingredient_accumulates() {
        let mut recipe = soup();
        recipe.add_ingredient("flour", 400.0, Unit::Gram).unwrap();
        recipe.add_ingredient("flour", 50.0, Unit::Gram).unwrap();
        assert_eq!(recipe.ingredient_amount("flour"), Some(450.0));
        assert_eq!(recipe.ingredient_unit("flour"), Some(Unit::Gram));
    }

    #[test]
    fn test_ingredient_unit_mismatch_leaves_amount() {
        let mut recipe = soup();
        recipe.add_ingredient("flour", 400.0, Unit::Gram).unwrap();
        let err = recipe.add_ingredient("flour", 1.0, Unit::Cup).unwrap_err();
        assert!(matches!(err, HubError::Argument(_)));
        assert_eq!(recipe.ingredient_amount("flour"), Some(400.0));
        assert_eq!(recipe.ingredient_unit("flour"), Some(Unit::Gram));
    }

    #[test]
    fn test_negative_add_rejected() {
        let mut recipe = soup();
        assert!(recipe.add_ingredient("salt", -1.0, Unit::Pinch).is_err());
        assert!(!recipe.has_ingredient("salt"));
    }

    #[test]
    fn test_remove_amount_errors_are_distinct() {
        let mut recipe = soup();
        recipe.add_ingredient("water", 1000.0, Unit::Milliliter).unwrap();

        let negative = recipe.remove_ingredient_amount("water", -5.0).unwrap_err();
        let unknown = recipe.remove_ingredient_amount("milk", 5.0).unwrap_err();
        let too_much = recipe.remove_ingredient_amount("water", 1000.5).unwrap_err();

        for err in [&negative, &unknown, &too_much] {
            assert!(matches!(err, HubError::Argument(_)));
        }
        assert_ne!(negative.to_string(), unknown.to_string());
        assert_ne!(unknown.to_string(), too_much.to_string());
        assert_eq!(recipe.ingredient_amount("water"), Some(1000.0));

        recipe.remove_ingredient_amount("water", 250.0).unwrap();
        assert_eq!(recipe.ingredient_amount("water"), Some(750.0));
    }

    #[test]
    fn test_remove_ingredient() {
        let mut recipe = soup();
        recipe.add_ingredient("water", 1000.0, Unit::Milliliter).unwrap();
        recipe.remove_ingredient("water").unwrap();
        assert!(!recipe.has_ingredient("water"));
        assert_eq!(recipe.ingredient_unit("water"), None);
        assert!(matches!(
            recipe.remove_ingredient("water"),
            Err(HubError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_ingredient_unit() {
        let mut recipe = soup();
        recipe.add_ingredient("water", 1.0, Unit::Liter).unwrap();
        recipe.set_ingredient_unit("water", Unit::Deciliter).unwrap();
        assert_eq!(recipe.ingredient_unit("water"), Some(Unit::Deciliter));
        assert!(recipe.set_ingredient_unit("milk", Unit::Liter).is_err());
    }

    #[test]
    fn test_steps() {
        let mut recipe = soup();
        recipe.add_step("Boil water");
        recipe.add_step("Serve");
        recipe.insert_step(1, "Add salt").unwrap();
        assert_eq!(recipe.steps(), ["Boil water", "Add salt", "Serve"]);
        assert_eq!(recipe.remove_step(0).unwrap(), "Boil water");
        assert!(matches!(
            recipe.remove_step(5),
            Err(HubError::Index { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_reviews() {
        let mut recipe = soup();
        assert_eq!(recipe.average_rating(), 0.0);

        recipe.add_review(Review::new(4.5, "good", "Other1").unwrap()).unwrap();
        assert_eq!(recipe.average_rating(), 4.5);

        let err = recipe
            .add_review(Review::new(1.0, "changed my mind", "Other1").unwrap())
            .unwrap_err();
        assert!(matches!(err, HubError::Duplicate(_)));
        assert_eq!(recipe.number_of_reviewers(), 1);

        recipe.add_review(Review::new(2.0, "", "Other2").unwrap()).unwrap();
        recipe.add_review(Review::new(4.0, "ok", "Other3").unwrap()).unwrap();
        // (4.5 + 2.0 + 4.0) / 3 = 3.5
        assert_eq!(recipe.average_rating(), 3.5);
        assert_eq!(recipe.number_of_reviewers(), 3);
        assert_eq!(recipe.number_of_comments(), 2);
    }

    #[test]
    fn test_average_rounds() {
        let mut recipe = soup();
        recipe.add_review(Review::new(5.0, "", "a1").unwrap()).unwrap();
        recipe.add_review(Review::new(4.0, "", "a2").unwrap()).unwrap();
        recipe.add_review(Review::new(4.0, "", "a3").unwrap()).unwrap();
        // 4.333.. -> 4.3
        assert_eq!(recipe.average_rating(), 4.3);
        recipe.add_review(Review::new(5.0, "", "a4").unwrap()).unwrap();
        recipe.add_review(Review::new(5.0, "", "a5").unwrap()).unwrap();
        recipe.add_review(Review::new(5.0, "", "a6").unwrap()).unwrap();
        // 4.666.. -> 4.7
        assert_eq!(recipe.average_rating(), 4.7);
    }

    #[test]
    fn test_identity_ignores_id_and_contents() {
        let mut a = soup();
        let mut b = soup();
        a.set_id(Some(1));
        b.set_id(Some(2));
        b.set_description("different");
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&Recipe::new("Soup", 4, "Someone99").unwrap()));
    }

    #[test]
    fn test_scale_to_portions() {
        let mut recipe = soup();
        recipe.add_ingredient("water", 1000.0, Unit::Milliliter).unwrap();
        let scaled = recipe.scale_to_portions(2).unwrap();
        assert_eq!(scaled.portions(), 2);
        assert_eq!(scaled.ingredient_amount("water"), Some(500.0));
        assert_eq!(recipe.ingredient_amount("water"), Some(1000.0));
        assert!(recipe.scale_to_portions(0).is_err());
    }

    #[test]
    fn test_json_field_names() {
        let mut recipe = soup();
        recipe.add_ingredient("water", 1000.0, Unit::Milliliter).unwrap();
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["authorUsername"], "Chef12345");
        assert_eq!(value["ingredientUnits"]["water"], "mL");
        assert_eq!(value["isSaved"], false);
        assert!(value["reviewList"].is_array());
        assert!(value["id"].is_null());
    }

    #[test]
    fn test_deserialize_rejects_broken_recipes() {
        let valid = serde_json::to_value(soup()).unwrap();

        let mut empty_name = valid.clone();
        empty_name["name"] = "".into();
        let mut no_portions = valid.clone();
        no_portions["portions"] = 0.into();
        let mut bad_rating = valid.clone();
        bad_rating["reviewList"] = serde_json::json!([{"rating": 99.0, "reviewer": "a"}]);
        let mut repeat_reviewer = valid.clone();
        repeat_reviewer["reviewList"] = serde_json::json!([
            {"rating": 4.0, "reviewer": "a"},
            {"rating": 2.0, "reviewer": "a"}
        ]);
        let mut unitless = valid.clone();
        unitless["ingredients"] = serde_json::json!({"water": 1.0});
        let mut negative = valid.clone();
        negative["ingredients"] = serde_json::json!({"water": -1.0});
        negative["ingredientUnits"] = serde_json::json!({"water": "L"});

        for broken in [
            empty_name,
            no_portions,
            bad_rating,
            repeat_reviewer,
            unitless,
            negative,
        ] {
            assert!(
                serde_json::from_value::<Recipe>(broken.clone()).is_err(),
                "accepted {}",
                broken
            );
        }
    }

    #[test]
    fn test_deserialize_keeps_contents() {
        let mut recipe = soup();
        recipe.set_description("Warm");
        recipe.set_id(Some(7));
        recipe.add_step("Boil");
        recipe.add_ingredient("water", 1.5, Unit::Liter).unwrap();
        recipe.add_review(Review::new(4.0, "nice", "Other1").unwrap()).unwrap();

        let json = serde_json::to_string(&recipe).unwrap();
        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recipe);

        let minimal: Recipe = serde_json::from_str(
            r#"{"name":"Toast","portions":1,"authorUsername":"Chef12345"}"#,
        )
        .unwrap();
        assert_eq!(minimal.id(), None);
        assert!(minimal.steps().is_empty());
    }
}
