mod commands;
mod seed;

use anyhow::Result;
use clap::{Parser, Subcommand};
use recipehub_core::{AccessConfig, LocalAccessBuilder, RecipeHubAccess, RemoteAccessBuilder};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipehub")]
#[command(about = "RecipeHub CLI", long_about = None)]
struct Cli {
    /// RecipeHub server URL. Without it the local store is used.
    #[arg(long, global = true, env = "RECIPEHUB_SERVER_URL")]
    server: Option<String>,

    /// Directory for the local store (default: home directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Credentials {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
}

#[derive(clap::Args)]
struct RecipeId {
    /// Recipe name
    #[arg(long)]
    name: String,
    /// Author username
    #[arg(long)]
    author: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new profile
    Register {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Check a username and password
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// List recipes
    Recipes {
        /// Only recipes by this author
        #[arg(long)]
        author: Option<String>,
    },
    /// Show one recipe in full
    Show {
        #[command(flatten)]
        recipe: RecipeId,
        /// Scale ingredient amounts to this many portions
        #[arg(long)]
        portions: Option<u32>,
    },
    /// Write a new recipe as the given user
    Create {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        portions: u32,
        #[arg(long, default_value = "")]
        description: String,
        /// A step; repeat for more
        #[arg(long = "step")]
        steps: Vec<String>,
        /// "name=amount unit", e.g. "flour=400 g"; repeat for more
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },
    /// Mark a recipe as a favorite
    Favorite {
        #[command(flatten)]
        credentials: Credentials,
        #[command(flatten)]
        recipe: RecipeId,
    },
    /// Drop a recipe from favorites
    Unfavorite {
        #[command(flatten)]
        credentials: Credentials,
        #[command(flatten)]
        recipe: RecipeId,
    },
    /// Rate a recipe
    Rate {
        #[command(flatten)]
        credentials: Credentials,
        #[command(flatten)]
        recipe: RecipeId,
        #[arg(long)]
        rating: f64,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Delete one of your own recipes
    Remove {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        name: String,
    },
    /// Seed the store with a user and sample recipes
    Seed {
        #[command(flatten)]
        credentials: Credentials,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn connect(server: Option<String>, data_dir: Option<PathBuf>) -> Result<Box<dyn RecipeHubAccess>> {
    let config = match (server, data_dir) {
        (Some(url), _) => AccessConfig::Remote(RemoteAccessBuilder::new().base_url(url)),
        (None, Some(dir)) => AccessConfig::Local(LocalAccessBuilder::new().data_dir(dir)),
        (None, None) => AccessConfig::from_env()?,
    };
    Ok(config.connect()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let access = connect(cli.server, cli.data_dir)?;
    let access = access.as_ref();

    match cli.command {
        Commands::Register { credentials } => {
            commands::register(access, &credentials.username, &credentials.password).await?;
        }
        Commands::Login { credentials } => {
            let profile =
                commands::login(access, &credentials.username, &credentials.password).await?;
            println!(
                "Logged in as {} ({} recipes, {} favorites)",
                profile.username(),
                profile.recipes().count(),
                profile.favorites().count()
            );
        }
        Commands::Recipes { author } => {
            commands::list_recipes(access, author.as_deref()).await?;
        }
        Commands::Show { recipe, portions } => {
            commands::show_recipe(access, &recipe.name, &recipe.author, portions).await?;
        }
        Commands::Create {
            credentials,
            name,
            portions,
            description,
            steps,
            ingredients,
        } => {
            let profile =
                commands::login(access, &credentials.username, &credentials.password).await?;
            let draft = commands::RecipeDraft {
                name,
                portions,
                description,
                steps,
                ingredients,
            };
            commands::create_recipe(access, profile, draft).await?;
        }
        Commands::Favorite {
            credentials,
            recipe,
        } => {
            let profile =
                commands::login(access, &credentials.username, &credentials.password).await?;
            commands::favorite(access, profile, &recipe.name, &recipe.author).await?;
        }
        Commands::Unfavorite {
            credentials,
            recipe,
        } => {
            let profile =
                commands::login(access, &credentials.username, &credentials.password).await?;
            commands::unfavorite(access, profile, &recipe.name, &recipe.author).await?;
        }
        Commands::Rate {
            credentials,
            recipe,
            rating,
            comment,
        } => {
            let profile =
                commands::login(access, &credentials.username, &credentials.password).await?;
            commands::rate(access, &profile, &recipe.name, &recipe.author, rating, &comment)
                .await?;
        }
        Commands::Remove { credentials, name } => {
            let profile =
                commands::login(access, &credentials.username, &credentials.password).await?;
            commands::remove_recipe(access, &profile, &name).await?;
        }
        Commands::Seed { credentials } => {
            seed::seed(access, &credentials.username, &credentials.password).await?;
        }
    }

    Ok(())
}
