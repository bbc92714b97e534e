use anyhow::{anyhow, bail, Context, Result};
use recipehub_core::{Profile, Recipe, RecipeHubAccess, RecipeRef, Review, Unit};

/// Fields for a recipe being created from the command line.
pub struct RecipeDraft {
    pub name: String,
    pub portions: u32,
    pub description: String,
    pub steps: Vec<String>,
    pub ingredients: Vec<String>,
}

pub async fn register(access: &dyn RecipeHubAccess, username: &str, password: &str) -> Result<()> {
    let profile = Profile::new(username, password)?;
    if !access.register_profile(&profile).await? {
        bail!("Failed to save profile {}", username);
    }
    println!("Registered {}", username);
    Ok(())
}

pub async fn login(access: &dyn RecipeHubAccess, username: &str, password: &str) -> Result<Profile> {
    let profile = access
        .authenticate(username, password)
        .await?
        .ok_or_else(|| anyhow!("Unknown username or wrong password"))?;
    tracing::debug!(username, "authenticated");
    Ok(profile)
}

pub async fn list_recipes(access: &dyn RecipeHubAccess, author: Option<&str>) -> Result<()> {
    let mut library = access.recipe_library().await?;
    if let Some(author) = author {
        library = library.by_author(author);
    }
    library.sort_by(|a, b| a.name().cmp(b.name()));

    if library.is_empty() {
        println!("No recipes");
        return Ok(());
    }
    for recipe in &library {
        println!(
            "{} by {} ({} portions, rated {:.1} by {})",
            recipe.name(),
            recipe.author(),
            recipe.portions(),
            recipe.average_rating(),
            recipe.number_of_reviewers()
        );
    }
    Ok(())
}

pub async fn show_recipe(
    access: &dyn RecipeHubAccess,
    name: &str,
    author: &str,
    portions: Option<u32>,
) -> Result<()> {
    let mut recipe = find_recipe(access, name, author).await?;
    if let Some(portions) = portions {
        recipe = recipe.scale_to_portions(portions)?;
    }

    println!("{} by {}", recipe.name(), recipe.author());
    if !recipe.description().is_empty() {
        println!("{}", recipe.description());
    }
    println!();
    println!("Serves {}", recipe.portions());
    for ingredient in recipe.ingredient_names() {
        let amount = recipe.ingredient_amount(ingredient).unwrap_or_default();
        let unit = recipe
            .ingredient_unit(ingredient)
            .map(|u| u.as_str())
            .unwrap_or("");
        println!("  - {} {} {}", format_amount(amount), unit, ingredient);
    }
    println!();
    for (i, step) in recipe.steps().iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }
    println!();
    println!(
        "Rated {:.1} by {} ({} comments)",
        recipe.average_rating(),
        recipe.number_of_reviewers(),
        recipe.number_of_comments()
    );
    for review in recipe.reviews().iter().filter(|r| r.has_comment()) {
        println!("  {} ({}): {}", review.reviewer(), review.rating(), review.comment());
    }
    Ok(())
}

pub async fn create_recipe(
    access: &dyn RecipeHubAccess,
    mut profile: Profile,
    draft: RecipeDraft,
) -> Result<()> {
    let mut recipe = Recipe::new(draft.name, draft.portions, profile.username())?;
    recipe.set_description(draft.description);
    for step in draft.steps {
        recipe.add_step(step);
    }
    for input in &draft.ingredients {
        let (name, amount, unit) = parse_ingredient(input)?;
        recipe
            .add_ingredient(&name, amount, unit)
            .with_context(|| format!("Invalid ingredient {:?}", input))?;
    }

    let library = access.recipe_library().await?;
    if library.contains(&recipe) {
        bail!("You already have a recipe called {:?}", recipe.name());
    }

    if !access.save_recipe(&recipe).await {
        bail!("Failed to save recipe {:?}", recipe.name());
    }
    profile.add_recipe(&recipe);
    if !access.save_profile(&profile).await {
        bail!("Recipe saved, but failed to update profile {}", profile.username());
    }
    println!("Created {}", recipe.reference());
    Ok(())
}

pub async fn favorite(
    access: &dyn RecipeHubAccess,
    mut profile: Profile,
    name: &str,
    author: &str,
) -> Result<()> {
    let recipe = find_recipe(access, name, author).await?;
    if !profile.add_favorite(&recipe) {
        println!("{} is already a favorite", recipe.reference());
        return Ok(());
    }
    if !access.save_profile(&profile).await {
        bail!("Failed to update profile {}", profile.username());
    }
    println!("Added {} to favorites", recipe.reference());
    Ok(())
}

pub async fn unfavorite(
    access: &dyn RecipeHubAccess,
    mut profile: Profile,
    name: &str,
    author: &str,
) -> Result<()> {
    let reference = RecipeRef::new(name, author);
    if !profile.remove_favorite(reference.clone()) {
        println!("{} was not a favorite", reference);
        return Ok(());
    }
    if !access.save_profile(&profile).await {
        bail!("Failed to update profile {}", profile.username());
    }
    println!("Removed {} from favorites", reference);
    Ok(())
}

pub async fn rate(
    access: &dyn RecipeHubAccess,
    profile: &Profile,
    name: &str,
    author: &str,
    rating: f64,
    comment: &str,
) -> Result<()> {
    let mut recipe = find_recipe(access, name, author).await?;
    recipe.add_review(Review::new(rating, comment, profile.username())?)?;
    if !access.save_recipe(&recipe).await {
        bail!("Failed to save review");
    }
    println!(
        "Rated {}; average is now {:.1}",
        recipe.reference(),
        recipe.average_rating()
    );
    Ok(())
}

pub async fn remove_recipe(access: &dyn RecipeHubAccess, profile: &Profile, name: &str) -> Result<()> {
    let recipe = find_recipe(access, name, profile.username()).await?;
    if !access.remove_recipe(&recipe).await {
        bail!("Failed to remove {}", recipe.reference());
    }
    println!("Removed {}", recipe.reference());
    Ok(())
}

async fn find_recipe(access: &dyn RecipeHubAccess, name: &str, author: &str) -> Result<Recipe> {
    let library = access.recipe_library().await?;
    let reference = RecipeRef::new(name, author);
    library
        .find(&reference)
        .cloned()
        .ok_or_else(|| anyhow!("No recipe {}", reference))
}

/// Parse "name=amount unit", e.g. "flour=400 g".
pub fn parse_ingredient(input: &str) -> Result<(String, f64, Unit)> {
    let (name, measure) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected name=amount unit, got {:?}", input))?;

    let mut parts = measure.split_whitespace();
    let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("Expected an amount and a unit in {:?}", input);
    };

    let amount: f64 = amount
        .parse()
        .with_context(|| format!("Invalid amount {:?}", amount))?;
    let unit: Unit = unit.parse()?;

    Ok((name.trim().to_string(), amount, unit))
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{:.2}", amount)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
