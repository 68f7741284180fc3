use crate::error::{AppError, Result};
use crate::models::{
    Category, Ingredient, NewCategory, NewIngredient, NewRecipe, NewTag, Recipe,
    RecipeIngredient, RecipeStep, RecipeTag, Tag,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

/// Trait for catalog storage operations.
///
/// Implementations enforce the natural-key and join-pair unique constraints
/// and cascade deletes from categories to recipes to recipe-owned rows.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a category; names are unique
    async fn insert_category(&self, new: NewCategory) -> Result<Category>;

    /// Get a category by ID
    async fn get_category(&self, id: u64) -> Result<Option<Category>>;

    /// Find a category by its exact name
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// List categories ordered by name
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Delete a category and every recipe referencing it
    async fn delete_category(&self, id: u64) -> Result<()>;

    /// Insert an ingredient; names are unique
    async fn insert_ingredient(&self, new: NewIngredient) -> Result<Ingredient>;

    /// Find an ingredient by its exact name
    async fn find_ingredient_by_name(&self, name: &str) -> Result<Option<Ingredient>>;

    /// List ingredients ordered by name
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>>;

    /// Insert a tag; names are unique
    async fn insert_tag(&self, new: NewTag) -> Result<Tag>;

    /// Find a tag by its exact name
    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// List tags in insertion order
    async fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Insert a recipe; the category must exist and the slug must be unique
    async fn insert_recipe(&self, new: NewRecipe) -> Result<Recipe>;

    /// Find the first recipe with this exact name
    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<Recipe>>;

    /// Get a recipe by slug
    async fn get_recipe_by_slug(&self, slug: &str) -> Result<Option<Recipe>>;

    /// List all recipes, most recently created first
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// Delete a recipe together with its ingredients, steps and tag links
    async fn delete_recipe(&self, id: u64) -> Result<()>;

    /// Attach an ingredient to a recipe; each pair appears at most once
    async fn add_recipe_ingredient(
        &self,
        recipe_id: u64,
        ingredient_id: u64,
        quantity: String,
        notes: String,
    ) -> Result<RecipeIngredient>;

    /// All recipe-ingredient rows in insertion order
    async fn list_recipe_ingredients(&self) -> Result<Vec<RecipeIngredient>>;

    /// Recipe-ingredient rows of one recipe in insertion order
    async fn recipe_ingredients_for(&self, recipe_id: u64) -> Result<Vec<RecipeIngredient>>;

    /// Add a numbered step; (recipe, step_number) is unique
    async fn add_recipe_step(
        &self,
        recipe_id: u64,
        step_number: u32,
        instruction: String,
        time_minutes: u32,
    ) -> Result<RecipeStep>;

    /// Steps of one recipe ordered by step number
    async fn steps_for(&self, recipe_id: u64) -> Result<Vec<RecipeStep>>;

    /// Link a tag to a recipe; each pair appears at most once
    async fn add_recipe_tag(&self, recipe_id: u64, tag_id: u64) -> Result<RecipeTag>;

    /// All recipe-tag links in insertion order
    async fn list_recipe_tags(&self) -> Result<Vec<RecipeTag>>;

    /// Tag links of one recipe in insertion order
    async fn recipe_tags_for(&self, recipe_id: u64) -> Result<Vec<RecipeTag>>;

    /// Row counts per table
    async fn counts(&self) -> Result<StoreCounts>;
}

/// Row counts per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub categories: usize,
    pub ingredients: usize,
    pub tags: usize,
    pub recipes: usize,
    pub recipe_ingredients: usize,
    pub recipe_steps: usize,
    pub recipe_tags: usize,
}

/// Sort recipes into the catalog's default order: newest first, then higher id
pub fn sort_recipes_default(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

pub(crate) fn validate_tag(new: &NewTag) -> Result<()> {
    new.validate()?;
    if !new.has_valid_color() {
        return Err(AppError::Validation(format!(
            "Tag color '{}' is not a #rrggbb hex code",
            new.color
        )));
    }
    Ok(())
}

pub(crate) fn validate_recipe(new: &NewRecipe) -> Result<()> {
    new.validate()?;
    let combined = new.combined_time()?;
    if let Some(total) = new.total_time {
        if total > 0 && total < combined {
            tracing::debug!(
                name = %new.name,
                total_time = total,
                "Explicit total time is shorter than prep + cook"
            );
        }
    }
    Ok(())
}

pub(crate) fn conflict(entity: &str, key: &str) -> AppError {
    AppError::Conflict(format!("{} '{}' already exists", entity, key))
}

#[derive(Default)]
struct CatalogTables {
    next_id: u64,
    categories: Vec<Category>,
    ingredients: Vec<Ingredient>,
    tags: Vec<Tag>,
    recipes: Vec<Recipe>,
    recipe_ingredients: Vec<RecipeIngredient>,
    recipe_steps: Vec<RecipeStep>,
    recipe_tags: Vec<RecipeTag>,
}

impl CatalogTables {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove_recipe_rows(&mut self, recipe_id: u64) {
        self.recipes.retain(|r| r.id != recipe_id);
        self.recipe_ingredients.retain(|ri| ri.recipe_id != recipe_id);
        self.recipe_steps.retain(|s| s.recipe_id != recipe_id);
        self.recipe_tags.retain(|t| t.recipe_id != recipe_id);
    }

    fn require_recipe(&self, recipe_id: u64) -> Result<()> {
        if self.recipes.iter().any(|r| r.id == recipe_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Recipe {} not found", recipe_id)))
        }
    }
}

/// In-memory catalog store (for development and testing)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<CatalogTables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_category(&self, new: NewCategory) -> Result<Category> {
        new.validate()?;
        let mut tables = self.tables.write();
        if tables.categories.iter().any(|c| c.name == new.name) {
            return Err(conflict("Category", &new.name));
        }

        let id = tables.allocate_id();
        let category = Category::from_new(id, new, Utc::now());
        tables.categories.push(category.clone());

        tracing::debug!(category_id = id, name = %category.name, "Category saved");
        Ok(category)
    }

    async fn get_category(&self, id: u64) -> Result<Option<Category>> {
        let tables = self.tables.read();
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let tables = self.tables.read();
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.tables.read().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn delete_category(&self, id: u64) -> Result<()> {
        let mut tables = self.tables.write();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        if tables.categories.len() == before {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        let doomed: Vec<u64> = tables
            .recipes
            .iter()
            .filter(|r| r.category_id == id)
            .map(|r| r.id)
            .collect();
        for recipe_id in &doomed {
            tables.remove_recipe_rows(*recipe_id);
        }

        tracing::debug!(category_id = id, cascaded = doomed.len(), "Category deleted");
        Ok(())
    }

    async fn insert_ingredient(&self, new: NewIngredient) -> Result<Ingredient> {
        new.validate()?;
        let mut tables = self.tables.write();
        if tables.ingredients.iter().any(|i| i.name == new.name) {
            return Err(conflict("Ingredient", &new.name));
        }

        let id = tables.allocate_id();
        let ingredient = Ingredient::from_new(id, new, Utc::now());
        tables.ingredients.push(ingredient.clone());
        Ok(ingredient)
    }

    async fn find_ingredient_by_name(&self, name: &str) -> Result<Option<Ingredient>> {
        let tables = self.tables.read();
        Ok(tables.ingredients.iter().find(|i| i.name == name).cloned())
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        let mut ingredients = self.tables.read().ingredients.clone();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn insert_tag(&self, new: NewTag) -> Result<Tag> {
        validate_tag(&new)?;
        let mut tables = self.tables.write();
        if tables.tags.iter().any(|t| t.name == new.name) {
            return Err(conflict("Tag", &new.name));
        }

        let id = tables.allocate_id();
        let tag = Tag::from_new(id, new);
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let tables = self.tables.read();
        Ok(tables.tags.iter().find(|t| t.name == name).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tables.read().tags.clone())
    }

    async fn insert_recipe(&self, new: NewRecipe) -> Result<Recipe> {
        validate_recipe(&new)?;
        let mut tables = self.tables.write();
        if !tables.categories.iter().any(|c| c.id == new.category_id) {
            return Err(AppError::Validation(format!(
                "Category {} does not exist",
                new.category_id
            )));
        }

        let id = tables.allocate_id();
        let recipe = Recipe::from_new(id, new, Utc::now())?;
        if recipe.slug.is_empty() {
            return Err(AppError::Validation(format!(
                "Cannot derive a slug from '{}'",
                recipe.name
            )));
        }
        if tables.recipes.iter().any(|r| r.slug == recipe.slug) {
            return Err(conflict("Recipe slug", &recipe.slug));
        }

        tables.recipes.push(recipe.clone());
        tracing::debug!(recipe_id = id, slug = %recipe.slug, "Recipe saved");
        Ok(recipe)
    }

    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<Recipe>> {
        let tables = self.tables.read();
        Ok(tables.recipes.iter().find(|r| r.name == name).cloned())
    }

    async fn get_recipe_by_slug(&self, slug: &str) -> Result<Option<Recipe>> {
        let tables = self.tables.read();
        Ok(tables.recipes.iter().find(|r| r.slug == slug).cloned())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut recipes = self.tables.read().recipes.clone();
        sort_recipes_default(&mut recipes);
        Ok(recipes)
    }

    async fn delete_recipe(&self, id: u64) -> Result<()> {
        let mut tables = self.tables.write();
        tables.require_recipe(id)?;
        tables.remove_recipe_rows(id);
        tracing::debug!(recipe_id = id, "Recipe deleted");
        Ok(())
    }

    async fn add_recipe_ingredient(
        &self,
        recipe_id: u64,
        ingredient_id: u64,
        quantity: String,
        notes: String,
    ) -> Result<RecipeIngredient> {
        let mut tables = self.tables.write();
        tables.require_recipe(recipe_id)?;
        if !tables.ingredients.iter().any(|i| i.id == ingredient_id) {
            return Err(AppError::NotFound(format!(
                "Ingredient {} not found",
                ingredient_id
            )));
        }
        if tables
            .recipe_ingredients
            .iter()
            .any(|ri| ri.recipe_id == recipe_id && ri.ingredient_id == ingredient_id)
        {
            return Err(conflict(
                "Recipe ingredient",
                &format!("{}/{}", recipe_id, ingredient_id),
            ));
        }

        let row = RecipeIngredient {
            id: tables.allocate_id(),
            recipe_id,
            ingredient_id,
            quantity,
            notes,
        };
        tables.recipe_ingredients.push(row.clone());
        Ok(row)
    }

    async fn list_recipe_ingredients(&self) -> Result<Vec<RecipeIngredient>> {
        Ok(self.tables.read().recipe_ingredients.clone())
    }

    async fn recipe_ingredients_for(&self, recipe_id: u64) -> Result<Vec<RecipeIngredient>> {
        let tables = self.tables.read();
        Ok(tables
            .recipe_ingredients
            .iter()
            .filter(|ri| ri.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    async fn add_recipe_step(
        &self,
        recipe_id: u64,
        step_number: u32,
        instruction: String,
        time_minutes: u32,
    ) -> Result<RecipeStep> {
        let mut tables = self.tables.write();
        tables.require_recipe(recipe_id)?;
        if tables
            .recipe_steps
            .iter()
            .any(|s| s.recipe_id == recipe_id && s.step_number == step_number)
        {
            return Err(conflict(
                "Recipe step",
                &format!("{}/{}", recipe_id, step_number),
            ));
        }

        let step = RecipeStep {
            id: tables.allocate_id(),
            recipe_id,
            step_number,
            instruction,
            time_minutes,
        };
        tables.recipe_steps.push(step.clone());
        Ok(step)
    }

    async fn steps_for(&self, recipe_id: u64) -> Result<Vec<RecipeStep>> {
        let tables = self.tables.read();
        let mut steps: Vec<RecipeStep> = tables
            .recipe_steps
            .iter()
            .filter(|s| s.recipe_id == recipe_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.step_number);
        Ok(steps)
    }

    async fn add_recipe_tag(&self, recipe_id: u64, tag_id: u64) -> Result<RecipeTag> {
        let mut tables = self.tables.write();
        tables.require_recipe(recipe_id)?;
        if !tables.tags.iter().any(|t| t.id == tag_id) {
            return Err(AppError::NotFound(format!("Tag {} not found", tag_id)));
        }
        if tables
            .recipe_tags
            .iter()
            .any(|l| l.recipe_id == recipe_id && l.tag_id == tag_id)
        {
            return Err(conflict("Recipe tag", &format!("{}/{}", recipe_id, tag_id)));
        }

        let link = RecipeTag {
            id: tables.allocate_id(),
            recipe_id,
            tag_id,
        };
        tables.recipe_tags.push(link);
        Ok(link)
    }

    async fn list_recipe_tags(&self) -> Result<Vec<RecipeTag>> {
        Ok(self.tables.read().recipe_tags.clone())
    }

    async fn recipe_tags_for(&self, recipe_id: u64) -> Result<Vec<RecipeTag>> {
        let tables = self.tables.read();
        Ok(tables
            .recipe_tags
            .iter()
            .filter(|l| l.recipe_id == recipe_id)
            .copied()
            .collect())
    }

    async fn counts(&self) -> Result<StoreCounts> {
        let tables = self.tables.read();
        Ok(StoreCounts {
            categories: tables.categories.len(),
            ingredients: tables.ingredients.len(),
            tags: tables.tags.len(),
            recipes: tables.recipes.len(),
            recipe_ingredients: tables.recipe_ingredients.len(),
            recipe_steps: tables.recipe_steps.len(),
            recipe_tags: tables.recipe_tags.len(),
        })
    }
}
