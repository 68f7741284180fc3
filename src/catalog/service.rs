use crate::analytics::{compute_stats, recipe_counts_by_category, CatalogStats};
use crate::catalog::views::{
    CategoryView, IngredientView, RecipeDetailView, RecipeListView, RecipeRelations, ViewContext,
};
use crate::error::{AppError, Result};
use crate::metrics::{CATALOG_QUERIES_TOTAL, RECIPE_LIST_RESULTS, STORE_ERRORS_TOTAL};
use crate::models::{Category, Recipe};
use crate::query::{self, Candidate, FilterContext, IngredientIndex, RecipeOrdering};
use crate::state::CatalogStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of recipes returned by `/featured/`
pub const FEATURED_LIMIT: usize = 8;

/// Read-side operations behind the HTTP API
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Get a reference to the catalog store
    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Filter and order recipes according to query parameters.
    ///
    /// Recognized parameters: `category`, `max_time`, `difficulty`,
    /// `ingredients`, `vegetarian`, `vegan`, `gluten_free`, `search` and
    /// `ordering`. Anything else is ignored.
    pub async fn list_recipes(&self, params: &HashMap<String, String>) -> Result<Vec<RecipeListView>> {
        CATALOG_QUERIES_TOTAL.with_label_values(&["list_recipes"]).inc();

        let recipes = observe("list_recipes", self.store.list_recipes().await)?;
        let categories = observe("list_categories", self.store.list_categories().await)?;

        let index = if params.contains_key("ingredients") {
            let usages = observe(
                "list_recipe_ingredients",
                self.store.list_recipe_ingredients().await,
            )?;
            let ingredients = observe("list_ingredients", self.store.list_ingredients().await)?;
            IngredientIndex::build(&recipes, &usages, &ingredients)
        } else {
            IngredientIndex::default()
        };

        let ctx = self.view_context(&categories).await?;
        let predicate = query::compile(params, &FilterContext { ingredients: &index });

        let mut matched: Vec<Recipe> = recipes
            .into_iter()
            .filter(|recipe| {
                predicate.matches(&Candidate {
                    recipe,
                    category_name: ctx.category_name(recipe.category_id),
                })
            })
            .collect();

        RecipeOrdering::parse(params.get("ordering").map(String::as_str)).apply(&mut matched);

        tracing::debug!(
            params = ?params,
            matched = matched.len(),
            "Filtered recipe listing"
        );
        RECIPE_LIST_RESULTS.observe(matched.len() as f64);

        Ok(matched
            .iter()
            .map(|recipe| RecipeListView::from_recipe(recipe, &ctx))
            .collect())
    }

    /// Recipe with its ingredients, steps and tags
    pub async fn recipe_detail(&self, slug: &str) -> Result<RecipeDetailView> {
        CATALOG_QUERIES_TOTAL.with_label_values(&["recipe_detail"]).inc();

        let recipe = observe("get_recipe_by_slug", self.store.get_recipe_by_slug(slug).await)?
            .ok_or_else(|| AppError::NotFound(format!("Recipe '{}' not found", slug)))?;

        let category = observe(
            "get_category",
            self.store.get_category(recipe.category_id).await,
        )?;
        let rows = observe(
            "recipe_ingredients_for",
            self.store.recipe_ingredients_for(recipe.id).await,
        )?;
        let ingredients = observe("list_ingredients", self.store.list_ingredients().await)?;
        let steps = observe("steps_for", self.store.steps_for(recipe.id).await)?;
        let links = observe("recipe_tags_for", self.store.recipe_tags_for(recipe.id).await)?;
        let tags = observe("list_tags", self.store.list_tags().await)?;
        let tag_names = ViewContext::new(&[], &tags, &links).tag_names(recipe.id);

        Ok(RecipeDetailView::assemble(
            &recipe,
            RecipeRelations {
                category: category.as_ref(),
                ingredients: &rows,
                ingredient_lookup: &ingredients,
                steps: &steps,
                tags: tag_names,
            },
        ))
    }

    /// All categories by name, each with its recipe count
    pub async fn categories(&self) -> Result<Vec<CategoryView>> {
        CATALOG_QUERIES_TOTAL.with_label_values(&["categories"]).inc();

        let categories = observe("list_categories", self.store.list_categories().await)?;
        let recipes = observe("list_recipes", self.store.list_recipes().await)?;
        let counts = recipe_counts_by_category(&recipes);

        Ok(categories
            .iter()
            .map(|c| CategoryView::new(c, counts.get(&c.id).copied().unwrap_or(0)))
            .collect())
    }

    /// All ingredients by name
    pub async fn ingredients(&self) -> Result<Vec<IngredientView>> {
        CATALOG_QUERIES_TOTAL.with_label_values(&["ingredients"]).inc();

        let ingredients = observe("list_ingredients", self.store.list_ingredients().await)?;
        Ok(ingredients.iter().map(IngredientView::from).collect())
    }

    /// Statistics over the whole catalog, ignoring any listing filters
    pub async fn stats(&self) -> Result<CatalogStats> {
        CATALOG_QUERIES_TOTAL.with_label_values(&["stats"]).inc();

        let recipes = observe("list_recipes", self.store.list_recipes().await)?;
        let categories = observe("list_categories", self.store.list_categories().await)?;
        Ok(compute_stats(&recipes, &categories))
    }

    /// Up to [`FEATURED_LIMIT`] featured recipes, newest first
    pub async fn featured(&self) -> Result<Vec<RecipeListView>> {
        CATALOG_QUERIES_TOTAL.with_label_values(&["featured"]).inc();

        let recipes = observe("list_recipes", self.store.list_recipes().await)?;
        let categories = observe("list_categories", self.store.list_categories().await)?;
        let ctx = self.view_context(&categories).await?;

        Ok(recipes
            .iter()
            .filter(|r| r.is_featured)
            .take(FEATURED_LIMIT)
            .map(|r| RecipeListView::from_recipe(r, &ctx))
            .collect())
    }

    async fn view_context(&self, categories: &[Category]) -> Result<ViewContext> {
        let tags = observe("list_tags", self.store.list_tags().await)?;
        let links = observe("list_recipe_tags", self.store.list_recipe_tags().await)?;
        Ok(ViewContext::new(categories, &tags, &links))
    }
}

/// Count failed store calls per operation
fn observe<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        STORE_ERRORS_TOTAL.with_label_values(&[operation]).inc();
        tracing::warn!(operation, error = %e, "Store operation failed");
    }
    result
}
