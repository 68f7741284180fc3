use crate::error::{AppError, Result};
use crate::models::{
    Category, Ingredient, NewCategory, NewIngredient, NewRecipe, NewTag, Recipe,
    RecipeIngredient, RecipeStep, RecipeTag, Tag,
};
use crate::state::store::{conflict, sort_recipes_default, validate_recipe, validate_tag};
use crate::state::{CatalogStore, StoreCounts};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

/// Persistent catalog store using Sled embedded database.
///
/// Every table is its own tree keyed by the big-endian row id, so iterating a
/// tree yields rows in insertion order. Rows are bincode-encoded.
///
/// Uniqueness checks and cascades span several trees, so writers are
/// serialized through `writes`; readers never take it.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
    writes: Arc<Mutex<()>>,
    categories: sled::Tree,
    ingredients: sled::Tree,
    tags: sled::Tree,
    recipes: sled::Tree,
    recipe_ingredients: sled::Tree,
    recipe_steps: sled::Tree,
    recipe_tags: sled::Tree,
}

impl SledStore {
    /// Open (or create) a Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            AppError::Database(format!("Failed to open Sled database: {}", e))
        })?;

        let open = |name: &str| {
            db.open_tree(name).map_err(|e| {
                AppError::Database(format!("Failed to open {} tree: {}", name, e))
            })
        };

        let store = Self {
            categories: open("categories")?,
            ingredients: open("ingredients")?,
            tags: open("tags")?,
            recipes: open("recipes")?,
            recipe_ingredients: open("recipe_ingredients")?,
            recipe_steps: open("recipe_steps")?,
            recipe_tags: open("recipe_tags")?,
            db: Arc::new(db),
            writes: Arc::new(Mutex::new(())),
        };

        tracing::info!("Initialized Sled store at {:?}", path.as_ref());
        Ok(store)
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await?;
        Ok(())
    }

    fn next_id(&self) -> Result<u64> {
        // generate_id starts at zero; keep ids 1-based like the in-memory store
        Ok(self.db.generate_id()? + 1)
    }

    fn key(id: u64) -> [u8; 8] {
        id.to_be_bytes()
    }

    fn put<T: Serialize>(tree: &sled::Tree, id: u64, row: &T) -> Result<()> {
        tree.insert(Self::key(id), bincode::serialize(row)?)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(tree: &sled::Tree, id: u64) -> Result<Option<T>> {
        match tree.get(Self::key(id))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(tree: &sled::Tree) -> Result<Vec<T>> {
        tree.iter()
            .values()
            .map(|value| -> Result<T> {
                let bytes = value?;
                Ok(bincode::deserialize(&bytes)?)
            })
            .collect()
    }

    fn find<T, F>(tree: &sled::Tree, predicate: F) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        for value in tree.iter().values() {
            let row: T = bincode::deserialize(&value?)?;
            if predicate(&row) {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    fn remove_where<T, F>(tree: &sled::Tree, predicate: F) -> Result<usize>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let mut removed = 0;
        for entry in tree.iter() {
            let (key, value) = entry?;
            let row: T = bincode::deserialize(&value)?;
            if predicate(&row) {
                tree.remove(key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Child rows go first so a failure never leaves orphans behind
    fn remove_recipe_rows(&self, recipe_id: u64) -> Result<()> {
        Self::remove_where::<RecipeIngredient, _>(&self.recipe_ingredients, |ri| {
            ri.recipe_id == recipe_id
        })?;
        Self::remove_where::<RecipeStep, _>(&self.recipe_steps, |s| s.recipe_id == recipe_id)?;
        Self::remove_where::<RecipeTag, _>(&self.recipe_tags, |l| l.recipe_id == recipe_id)?;
        self.recipes.remove(Self::key(recipe_id))?;
        Ok(())
    }

    fn require_recipe(&self, recipe_id: u64) -> Result<()> {
        if self.recipes.contains_key(Self::key(recipe_id))? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Recipe {} not found", recipe_id)))
        }
    }
}

#[async_trait]
impl CatalogStore for SledStore {
    async fn insert_category(&self, new: NewCategory) -> Result<Category> {
        let _writes = self.writes.lock();
        new.validate()?;
        if Self::find::<Category, _>(&self.categories, |c| c.name == new.name)?.is_some() {
            return Err(conflict("Category", &new.name));
        }

        let category = Category::from_new(self.next_id()?, new, Utc::now());
        Self::put(&self.categories, category.id, &category)?;

        tracing::debug!(category_id = category.id, name = %category.name, "Category saved to Sled");
        Ok(category)
    }

    async fn get_category(&self, id: u64) -> Result<Option<Category>> {
        Self::fetch(&self.categories, id)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        Self::find(&self.categories, |c: &Category| c.name == name)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = Self::scan(&self.categories)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn delete_category(&self, id: u64) -> Result<()> {
        let _writes = self.writes.lock();
        if !self.categories.contains_key(Self::key(id))? {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        let doomed: Vec<u64> = Self::scan::<Recipe>(&self.recipes)?
            .into_iter()
            .filter(|r| r.category_id == id)
            .map(|r| r.id)
            .collect();
        for recipe_id in &doomed {
            self.remove_recipe_rows(*recipe_id)?;
        }
        self.categories.remove(Self::key(id))?;

        tracing::debug!(category_id = id, cascaded = doomed.len(), "Category deleted from Sled");
        Ok(())
    }

    async fn insert_ingredient(&self, new: NewIngredient) -> Result<Ingredient> {
        let _writes = self.writes.lock();
        new.validate()?;
        if Self::find::<Ingredient, _>(&self.ingredients, |i| i.name == new.name)?.is_some() {
            return Err(conflict("Ingredient", &new.name));
        }

        let ingredient = Ingredient::from_new(self.next_id()?, new, Utc::now());
        Self::put(&self.ingredients, ingredient.id, &ingredient)?;
        Ok(ingredient)
    }

    async fn find_ingredient_by_name(&self, name: &str) -> Result<Option<Ingredient>> {
        Self::find(&self.ingredients, |i: &Ingredient| i.name == name)
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        let mut ingredients: Vec<Ingredient> = Self::scan(&self.ingredients)?;
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn insert_tag(&self, new: NewTag) -> Result<Tag> {
        let _writes = self.writes.lock();
        validate_tag(&new)?;
        if Self::find::<Tag, _>(&self.tags, |t| t.name == new.name)?.is_some() {
            return Err(conflict("Tag", &new.name));
        }

        let tag = Tag::from_new(self.next_id()?, new);
        Self::put(&self.tags, tag.id, &tag)?;
        Ok(tag)
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        Self::find(&self.tags, |t: &Tag| t.name == name)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        Self::scan(&self.tags)
    }

    async fn insert_recipe(&self, new: NewRecipe) -> Result<Recipe> {
        let _writes = self.writes.lock();
        validate_recipe(&new)?;
        if !self.categories.contains_key(Self::key(new.category_id))? {
            return Err(AppError::Validation(format!(
                "Category {} does not exist",
                new.category_id
            )));
        }

        let recipe = Recipe::from_new(self.next_id()?, new, Utc::now())?;
        if recipe.slug.is_empty() {
            return Err(AppError::Validation(format!(
                "Cannot derive a slug from '{}'",
                recipe.name
            )));
        }
        if Self::find::<Recipe, _>(&self.recipes, |r| r.slug == recipe.slug)?.is_some() {
            return Err(conflict("Recipe slug", &recipe.slug));
        }

        Self::put(&self.recipes, recipe.id, &recipe)?;
        tracing::debug!(recipe_id = recipe.id, slug = %recipe.slug, "Recipe saved to Sled");
        Ok(recipe)
    }

    async fn find_recipe_by_name(&self, name: &str) -> Result<Option<Recipe>> {
        Self::find(&self.recipes, |r: &Recipe| r.name == name)
    }

    async fn get_recipe_by_slug(&self, slug: &str) -> Result<Option<Recipe>> {
        Self::find(&self.recipes, |r: &Recipe| r.slug == slug)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = Self::scan(&self.recipes)?;
        sort_recipes_default(&mut recipes);
        Ok(recipes)
    }

    async fn delete_recipe(&self, id: u64) -> Result<()> {
        let _writes = self.writes.lock();
        self.require_recipe(id)?;
        self.remove_recipe_rows(id)?;
        tracing::debug!(recipe_id = id, "Recipe deleted from Sled");
        Ok(())
    }

    async fn add_recipe_ingredient(
        &self,
        recipe_id: u64,
        ingredient_id: u64,
        quantity: String,
        notes: String,
    ) -> Result<RecipeIngredient> {
        let _writes = self.writes.lock();
        self.require_recipe(recipe_id)?;
        if !self.ingredients.contains_key(Self::key(ingredient_id))? {
            return Err(AppError::NotFound(format!(
                "Ingredient {} not found",
                ingredient_id
            )));
        }
        let existing = Self::find::<RecipeIngredient, _>(&self.recipe_ingredients, |ri| {
            ri.recipe_id == recipe_id && ri.ingredient_id == ingredient_id
        })?;
        if existing.is_some() {
            return Err(conflict(
                "Recipe ingredient",
                &format!("{}/{}", recipe_id, ingredient_id),
            ));
        }

        let row = RecipeIngredient {
            id: self.next_id()?,
            recipe_id,
            ingredient_id,
            quantity,
            notes,
        };
        Self::put(&self.recipe_ingredients, row.id, &row)?;
        Ok(row)
    }

    async fn list_recipe_ingredients(&self) -> Result<Vec<RecipeIngredient>> {
        Self::scan(&self.recipe_ingredients)
    }

    async fn recipe_ingredients_for(&self, recipe_id: u64) -> Result<Vec<RecipeIngredient>> {
        Ok(Self::scan::<RecipeIngredient>(&self.recipe_ingredients)?
            .into_iter()
            .filter(|ri| ri.recipe_id == recipe_id)
            .collect())
    }

    async fn add_recipe_step(
        &self,
        recipe_id: u64,
        step_number: u32,
        instruction: String,
        time_minutes: u32,
    ) -> Result<RecipeStep> {
        let _writes = self.writes.lock();
        self.require_recipe(recipe_id)?;
        let existing = Self::find::<RecipeStep, _>(&self.recipe_steps, |s| {
            s.recipe_id == recipe_id && s.step_number == step_number
        })?;
        if existing.is_some() {
            return Err(conflict(
                "Recipe step",
                &format!("{}/{}", recipe_id, step_number),
            ));
        }

        let step = RecipeStep {
            id: self.next_id()?,
            recipe_id,
            step_number,
            instruction,
            time_minutes,
        };
        Self::put(&self.recipe_steps, step.id, &step)?;
        Ok(step)
    }

    async fn steps_for(&self, recipe_id: u64) -> Result<Vec<RecipeStep>> {
        let mut steps: Vec<RecipeStep> = Self::scan::<RecipeStep>(&self.recipe_steps)?
            .into_iter()
            .filter(|s| s.recipe_id == recipe_id)
            .collect();
        steps.sort_by_key(|s| s.step_number);
        Ok(steps)
    }

    async fn add_recipe_tag(&self, recipe_id: u64, tag_id: u64) -> Result<RecipeTag> {
        let _writes = self.writes.lock();
        self.require_recipe(recipe_id)?;
        if !self.tags.contains_key(Self::key(tag_id))? {
            return Err(AppError::NotFound(format!("Tag {} not found", tag_id)));
        }
        let existing = Self::find::<RecipeTag, _>(&self.recipe_tags, |l| {
            l.recipe_id == recipe_id && l.tag_id == tag_id
        })?;
        if existing.is_some() {
            return Err(conflict("Recipe tag", &format!("{}/{}", recipe_id, tag_id)));
        }

        let link = RecipeTag {
            id: self.next_id()?,
            recipe_id,
            tag_id,
        };
        Self::put(&self.recipe_tags, link.id, &link)?;
        Ok(link)
    }

    async fn list_recipe_tags(&self) -> Result<Vec<RecipeTag>> {
        Self::scan(&self.recipe_tags)
    }

    async fn recipe_tags_for(&self, recipe_id: u64) -> Result<Vec<RecipeTag>> {
        Ok(Self::scan::<RecipeTag>(&self.recipe_tags)?
            .into_iter()
            .filter(|l| l.recipe_id == recipe_id)
            .collect())
    }

    async fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            categories: self.categories.len(),
            ingredients: self.ingredients.len(),
            tags: self.tags.len(),
            recipes: self.recipes.len(),
            recipe_ingredients: self.recipe_ingredients.len(),
            recipe_steps: self.recipe_steps.len(),
            recipe_tags: self.recipe_tags.len(),
        })
    }
}
