use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use recipe_catalog::{
    config::{StateBackend, StateConfig},
    seed::{seed_catalog, SeedFixture},
    state::create_store,
};
use reqwest::Client;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipe-catalog-cli")]
#[command(about = "Recipe Catalog CLI", version, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        env = "RECIPE_CATALOG_ENDPOINT",
        default_value = "http://localhost:8080"
    )]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a store with the built-in sample recipes or a TOML fixture
    Seed {
        /// sled database directory; seeds a throwaway in-memory store when omitted
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// TOML fixture to load instead of the built-in one
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },

    /// List recipes
    List {
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short = 't', long)]
        max_time: Option<String>,

        #[arg(short, long)]
        difficulty: Option<String>,

        /// Comma-separated ingredient names, all of which must match
        #[arg(short, long)]
        ingredients: Option<String>,

        #[arg(long)]
        vegetarian: bool,

        #[arg(long)]
        vegan: bool,

        #[arg(long)]
        gluten_free: bool,

        #[arg(short, long)]
        search: Option<String>,

        /// e.g. `-created_at` or `total_time,name`
        #[arg(short, long)]
        ordering: Option<String>,
    },

    /// Get recipe details
    Get {
        #[arg(value_name = "SLUG")]
        slug: String,
    },

    /// List categories with recipe counts
    Categories,

    /// List ingredients
    Ingredients,

    /// Show catalog statistics
    Stats,

    /// List featured recipes
    Featured,

    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (path, query) = match cli.command {
        Commands::Seed { path, fixture } => return seed(path, fixture.as_deref()).await,
        Commands::List {
            category,
            max_time,
            difficulty,
            ingredients,
            vegetarian,
            vegan,
            gluten_free,
            search,
            ordering,
        } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            let optional = [
                ("category", category),
                ("max_time", max_time),
                ("difficulty", difficulty),
                ("ingredients", ingredients),
                ("search", search),
                ("ordering", ordering),
            ];
            query.extend(
                optional
                    .into_iter()
                    .filter_map(|(key, value)| value.map(|v| (key, v))),
            );
            let flags = [
                ("vegetarian", vegetarian),
                ("vegan", vegan),
                ("gluten_free", gluten_free),
            ];
            query.extend(
                flags
                    .into_iter()
                    .filter(|(_, set)| *set)
                    .map(|(key, _)| (key, "true".to_string())),
            );
            ("/recipes/".to_string(), query)
        }
        Commands::Get { slug } => (format!("/recipes/{}/", slug), Vec::new()),
        Commands::Categories => ("/categories/".to_string(), Vec::new()),
        Commands::Ingredients => ("/ingredients/".to_string(), Vec::new()),
        Commands::Stats => ("/stats/".to_string(), Vec::new()),
        Commands::Featured => ("/featured/".to_string(), Vec::new()),
        Commands::Health => ("/health".to_string(), Vec::new()),
    };

    let client = Client::new();
    let url = format!("{}{}", cli.endpoint.trim_end_matches('/'), path);
    let response = client
        .get(&url)
        .query(&query)
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;

    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("response body is not JSON")?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("server answered {}", status);
    }
    Ok(())
}

async fn seed(path: Option<PathBuf>, fixture: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = match path {
        Some(path) => StateConfig {
            backend: StateBackend::Sled,
            path: Some(path),
        },
        None => StateConfig::default(),
    };

    let store = create_store(&config).context("failed to open store")?;
    let fixture = SeedFixture::load(fixture).context("failed to load fixture")?;
    let report = seed_catalog(store.as_ref(), &fixture)
        .await
        .context("seeding failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
