use anyhow::{bail, Context, Result};
use recipehub_core::{Profile, Recipe, RecipeHubAccess, Unit};

struct SeedRecipe {
    name: &'static str,
    portions: u32,
    description: &'static str,
    steps: &'static [&'static str],
    ingredients: &'static [(&'static str, f64, Unit)], // (name, amount, unit)
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        name: "Red Lentil Soup",
        portions: 4,
        description: "Thick weeknight soup that needs one pot and pantry staples.",
        steps: &[
            "Soften the onion and carrot in olive oil for eight minutes.",
            "Stir in the garlic and cumin and let them sizzle briefly.",
            "Add rinsed lentils and stock, then simmer for twenty minutes.",
            "Blend half of the pot and stir it back in.",
            "Finish with lemon juice and salt to taste.",
        ],
        ingredients: &[
            ("red lentils", 250.0, Unit::Gram),
            ("vegetable stock", 1.2, Unit::Liter),
            ("onion", 1.0, Unit::Piece),
            ("carrot", 2.0, Unit::Piece),
            ("garlic", 2.0, Unit::Clove),
            ("ground cumin", 2.0, Unit::Teaspoon),
            ("olive oil", 2.0, Unit::Tablespoon),
            ("lemon juice", 1.0, Unit::Tablespoon),
        ],
    },
    SeedRecipe {
        name: "Buttermilk Pancakes",
        portions: 3,
        description: "Fluffy Sunday pancakes. Rest the batter while the pan heats.",
        steps: &[
            "Whisk flour, sugar, baking powder and salt in a large bowl.",
            "Beat buttermilk, egg and melted butter in a jug.",
            "Fold the wet mix into the dry until just combined; lumps are fine.",
            "Ladle onto a buttered pan over medium heat and flip when bubbles form.",
        ],
        ingredients: &[
            ("flour", 200.0, Unit::Gram),
            ("buttermilk", 300.0, Unit::Milliliter),
            ("egg", 1.0, Unit::Piece),
            ("butter", 30.0, Unit::Gram),
            ("sugar", 1.0, Unit::Tablespoon),
            ("baking powder", 2.0, Unit::Teaspoon),
            ("salt", 1.0, Unit::Pinch),
        ],
    },
    SeedRecipe {
        name: "Tomato Bruschetta",
        portions: 6,
        description: "Summer starter for ripe tomatoes and day-old bread.",
        steps: &[
            "Dice the tomatoes and toss them with basil, oil and salt.",
            "Leave the tomatoes for ten minutes to release their juice.",
            "Toast the bread slices and rub them with a cut garlic clove.",
            "Spoon the tomatoes over the toast just before serving.",
        ],
        ingredients: &[
            ("tomatoes", 500.0, Unit::Gram),
            ("sourdough", 6.0, Unit::Piece),
            ("garlic", 1.0, Unit::Clove),
            ("basil leaves", 10.0, Unit::Piece),
            ("olive oil", 3.0, Unit::Tablespoon),
            ("flaky salt", 1.0, Unit::Pinch),
        ],
    },
    SeedRecipe {
        name: "Baked Oatmeal",
        portions: 6,
        description: "Make-ahead breakfast that reheats well all week.",
        steps: &[
            "Heat the oven to 180C and butter a baking dish.",
            "Mix oats, cinnamon and baking powder.",
            "Whisk milk, eggs and honey, then pour over the oats.",
            "Scatter apple on top and bake for forty minutes.",
        ],
        ingredients: &[
            ("rolled oats", 200.0, Unit::Gram),
            ("milk", 500.0, Unit::Milliliter),
            ("eggs", 2.0, Unit::Piece),
            ("honey", 3.0, Unit::Tablespoon),
            ("apple", 1.0, Unit::Piece),
            ("cinnamon", 1.0, Unit::Teaspoon),
            ("baking powder", 1.0, Unit::Teaspoon),
        ],
    },
];

fn build_recipe(seed: &SeedRecipe, author: &str) -> Result<Recipe> {
    let mut recipe = Recipe::new(seed.name, seed.portions, author)?;
    recipe.set_description(seed.description);
    for step in seed.steps {
        recipe.add_step(*step);
    }
    for (name, amount, unit) in seed.ingredients {
        recipe.add_ingredient(name, *amount, *unit)?;
    }
    Ok(recipe)
}

pub async fn seed(access: &dyn RecipeHubAccess, username: &str, password: &str) -> Result<()> {
    // If the user can log in, the store was seeded before
    if access.authenticate(username, password).await?.is_some() {
        println!("User '{}' already exists, skipping seed", username);
        return Ok(());
    }

    let mut profile = Profile::new(username, password)?;
    if !access
        .register_profile(&profile)
        .await
        .context("Failed to create user")?
    {
        bail!("Failed to create user {}", username);
    }
    println!("Created new user: {}", username);

    println!("Creating {} sample recipes...", SAMPLE_RECIPES.len());

    for seed in SAMPLE_RECIPES {
        let recipe = build_recipe(seed, username)
            .with_context(|| format!("Invalid sample recipe: {}", seed.name))?;
        if !access.save_recipe(&recipe).await {
            bail!("Failed to create recipe: {}", seed.name);
        }
        profile.add_recipe(&recipe);
        println!("  Created: {}", seed.name);
    }

    if !access.save_profile(&profile).await {
        bail!("Failed to update profile {}", username);
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("SEED DATA COMPLETE");
    println!("{}", "=".repeat(50));
    println!("Username: {}", username);
    println!("Recipes:  {}", SAMPLE_RECIPES.len());

    Ok(())
}
