//! Tests for the JSON file store.
//!
//! Each test gets its own temporary directory, so tests can run in parallel.

use recipehub_core::{
    HubError, LocalAccess, Profile, Recipe, RecipeHubAccess, RecipeLibrary, Review, Unit,
};
use std::fs;
use tempfile::TempDir;

fn store() -> (TempDir, LocalAccess) {
    let temp_dir = TempDir::new().unwrap();
    let access = LocalAccess::new(temp_dir.path());
    (temp_dir, access)
}

#[tokio::test]
async fn test_first_run_is_empty() {
    let (_dir, access) = store();
    assert!(access.recipe_library().await.unwrap().is_empty());
    assert!(access.profiles().await.unwrap().is_empty());
    assert!(access.load_profile("Chef12345").await.unwrap().is_none());
}

#[tokio::test]
async fn test_recipe_survives_new_access() {
    let temp_dir = TempDir::new().unwrap();

    let mut soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
    soup.set_description("Warm and simple");
    soup.add_step("Boil the water");
    soup.add_ingredient("water", 1000.0, Unit::Milliliter).unwrap();
    soup.add_review(Review::new(4.5, "good", "Other1").unwrap()).unwrap();
    assert!(LocalAccess::new(temp_dir.path()).save_recipe(&soup).await);

    let library = LocalAccess::new(temp_dir.path())
        .recipe_library()
        .await
        .unwrap();
    let stored = library.get(0).unwrap();
    assert_eq!(stored.name(), "Soup");
    assert_eq!(stored.description(), "Warm and simple");
    assert_eq!(stored.ingredient_amount("water"), Some(1000.0));
    assert_eq!(stored.ingredient_unit("water"), Some(Unit::Milliliter));
    assert_eq!(stored.average_rating(), 4.5);
    assert_eq!(stored.id(), Some(1));
}

#[tokio::test]
async fn test_recipe_document_shape() {
    let (_dir, access) = store();
    let soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
    access.save_recipe(&soup).await;

    let content = fs::read_to_string(access.recipes_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let stored = &value["recipes"][0];
    for key in [
        "name",
        "portions",
        "description",
        "steps",
        "ingredients",
        "ingredientUnits",
        "authorUsername",
        "isSaved",
        "reviewList",
        "id",
    ] {
        assert!(stored.get(key).is_some(), "missing key {}", key);
    }
}

#[tokio::test]
async fn test_save_recipe_upserts_by_identity() {
    let (_dir, access) = store();
    let soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
    access.save_recipe(&soup).await;
    access
        .save_recipe(&Recipe::new("Soup", 4, "Other1234").unwrap())
        .await;

    let mut edited = soup.clone();
    edited.set_portions(6).unwrap();
    access.save_recipe(&edited).await;

    let library = access.recipe_library().await.unwrap();
    assert_eq!(library.len(), 2);
    let stored = library.find(&soup.reference()).unwrap();
    assert_eq!(stored.portions(), 6);
    assert_eq!(stored.id(), Some(1));
}

#[tokio::test]
async fn test_remove_recipe_cascades_to_favorites() {
    let (_dir, access) = store();
    let recipe = Recipe::new("Soup", 4, "Chef12345").unwrap();
    let other = Recipe::new("Bread", 2, "Chef12345").unwrap();
    access.save_recipe(&recipe).await;
    access.save_recipe(&other).await;

    let mut fan_a = Profile::new("FanNumber1", "Secret123").unwrap();
    fan_a.add_favorite(&recipe);
    fan_a.add_favorite(&other);
    let mut fan_b = Profile::new("FanNumber2", "Secret123").unwrap();
    fan_b.add_favorite(&recipe);
    assert!(access.save_profile(&fan_a).await);
    assert!(access.save_profile(&fan_b).await);

    assert!(access.remove_recipe(&recipe).await);

    let library = access.recipe_library().await.unwrap();
    assert!(!library.contains(&recipe));
    assert!(library.contains(&other));

    for username in ["FanNumber1", "FanNumber2"] {
        let profile = access.load_profile(username).await.unwrap().unwrap();
        assert!(!profile.has_favorite(&recipe.reference()), "{}", username);
    }
    let fan_a = access.load_profile("FanNumber1").await.unwrap().unwrap();
    assert!(fan_a.has_favorite(&other.reference()));
}

#[tokio::test]
async fn test_remove_missing_recipe_is_false() {
    let (_dir, access) = store();
    let soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
    assert!(!access.remove_recipe(&soup).await);
}

#[tokio::test]
async fn test_profiles_upsert_and_replace() {
    let (_dir, access) = store();
    let chef = Profile::new("Chef12345", "Secret123").unwrap();
    assert!(access.save_profile(&chef).await);
    assert!(access.save_profile(&chef).await);
    assert_eq!(access.profiles().await.unwrap().len(), 1);

    let others = [
        Profile::new("FanNumber1", "Secret123").unwrap(),
        Profile::new("FanNumber2", "Secret123").unwrap(),
    ];
    assert!(access.save_profiles(&others).await);
    let names: Vec<String> = access
        .profiles()
        .await
        .unwrap()
        .iter()
        .map(|p| p.username().to_string())
        .collect();
    assert_eq!(names, ["FanNumber1", "FanNumber2"]);
}

#[tokio::test]
async fn test_register_and_authenticate() {
    let (_dir, access) = store();
    let chef = Profile::new("Chef12345", "Secret123").unwrap();
    assert!(access.register_profile(&chef).await.unwrap());

    let again = Profile::new("Chef12345", "Another123").unwrap();
    assert!(matches!(
        access.register_profile(&again).await,
        Err(HubError::Duplicate(_))
    ));

    let loaded = access
        .authenticate("Chef12345", "Secret123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.password(), None);
    assert!(access
        .authenticate("Chef12345", "Another123")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_write_failure_is_false() {
    let temp_dir = TempDir::new().unwrap();
    // A file where the data directory should be makes every write fail.
    let blocker = temp_dir.path().join("blocked");
    fs::write(&blocker, "").unwrap();
    let access = LocalAccess::new(&blocker);

    let soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
    assert!(!access.save_recipe(&soup).await);
    assert!(
        !access
            .save_profile(&Profile::new("Chef12345", "Secret123").unwrap())
            .await
    );
    assert_eq!(access.recipe_library().await.unwrap(), RecipeLibrary::new());
}

/// Register, write a recipe, review it, then try to review it twice.
#[tokio::test]
async fn test_authoring_scenario() {
    let (_dir, access) = store();

    let mut chef = Profile::new("Chef12345", "Secret123").unwrap();
    let mut soup = Recipe::new("Soup", 4, chef.username()).unwrap();
    soup.add_ingredient("water", 1000.0, Unit::Milliliter).unwrap();
    soup.add_review(Review::new(4.5, "good", "Other1").unwrap()).unwrap();
    assert_eq!(soup.average_rating(), 4.5);

    let second = Review::new(2.0, "second thoughts", "Other1").unwrap();
    assert!(matches!(
        soup.add_review(second),
        Err(HubError::Duplicate(_))
    ));
    assert_eq!(soup.number_of_reviewers(), 1);

    chef.add_recipe(&soup);
    assert!(access.register_profile(&chef).await.unwrap());
    assert!(access.save_recipe(&soup).await);

    let author = access.author_of(&soup).await.unwrap().unwrap();
    assert!(author.owns(&soup.reference()));
}

#[tokio::test]
async fn test_corrupt_profiles_file_is_not_overwritten() {
    let (_dir, access) = store();
    for username in ["Alice1234", "Bobby1234"] {
        assert!(
            access
                .save_profile(&Profile::new(username, "Secret123").unwrap())
                .await
        );
    }

    let mut content = fs::read_to_string(access.profiles_path()).unwrap();
    content.push('x');
    fs::write(access.profiles_path(), &content).unwrap();

    assert!(
        !access
            .save_profile(&Profile::new("Carol1234", "Secret123").unwrap())
            .await
    );
    assert_eq!(fs::read_to_string(access.profiles_path()).unwrap(), content);
    // Reads still degrade to empty.
    assert!(access.profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_files_block_recipe_writes() {
    let (_dir, access) = store();
    let soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
    assert!(access.save_recipe(&soup).await);

    fs::write(access.profiles_path(), "[{").unwrap();
    assert!(!access.remove_recipe(&soup).await);
    assert_eq!(access.recipe_library().await.unwrap().len(), 1);

    fs::write(access.recipes_path(), "{ not json").unwrap();
    let bread = Recipe::new("Bread", 2, "Chef12345").unwrap();
    assert!(!access.save_recipe(&bread).await);
    assert_eq!(
        fs::read_to_string(access.recipes_path()).unwrap(),
        "{ not json"
    );
}

#[tokio::test]
async fn test_invalid_stored_recipe_makes_file_unreadable() {
    let (_dir, access) = store();
    fs::write(
        access.recipes_path(),
        r#"{"recipes":[{"name":"","portions":0,"authorUsername":"Chef12345"}]}"#,
    )
    .unwrap();

    assert!(access.recipe_library().await.unwrap().is_empty());
    let soup = Recipe::new("Soup", 4, "Chef12345").unwrap();
    assert!(!access.save_recipe(&soup).await);
}
