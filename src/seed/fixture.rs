use crate::error::Result;
use crate::models::{Difficulty, NewCategory, NewIngredient, NewRecipe, NewTag};
use serde::Deserialize;
use std::path::Path;

const BUILTIN_FIXTURE: &str = include_str!("../../fixtures/healthy_recipes.toml");

/// A complete data set to seed the catalog with
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFixture {
    #[serde(default)]
    pub categories: Vec<NewCategory>,
    #[serde(default)]
    pub ingredients: Vec<NewIngredient>,
    #[serde(default)]
    pub tags: Vec<NewTag>,
    #[serde(default)]
    pub recipes: Vec<FixtureRecipe>,
}

impl SeedFixture {
    /// The sample catalog shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_FIXTURE)
    }

    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&source)
    }

    /// `path` when given, the built-in fixture otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }
}

/// A recipe referencing its category, ingredients and tags by name
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRecipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub calories_per_serving: u32,
    #[serde(default)]
    pub protein_grams: f64,
    #[serde(default)]
    pub carbs_grams: f64,
    #[serde(default)]
    pub fat_grams: f64,
    #[serde(default)]
    pub fiber_grams: f64,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_dairy_free: bool,
    /// Seeded recipes are featured unless stated otherwise
    #[serde(default = "default_featured")]
    pub is_featured: bool,
    #[serde(default)]
    pub ingredients: Vec<FixtureIngredient>,
    #[serde(default)]
    pub steps: Vec<FixtureStep>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl FixtureRecipe {
    pub fn to_new_recipe(&self, category_id: u64) -> NewRecipe {
        NewRecipe {
            name: self.name.clone(),
            slug: None,
            description: self.description.clone(),
            image: self.image.clone(),
            category_id,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            total_time: None,
            difficulty: self.difficulty,
            servings: self.servings,
            calories_per_serving: self.calories_per_serving,
            protein_grams: self.protein_grams,
            carbs_grams: self.carbs_grams,
            fat_grams: self.fat_grams,
            fiber_grams: self.fiber_grams,
            is_vegetarian: self.is_vegetarian,
            is_vegan: self.is_vegan,
            is_gluten_free: self.is_gluten_free,
            is_dairy_free: self.is_dairy_free,
            is_featured: self.is_featured,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureIngredient {
    pub name: String,
    pub quantity: String,
    #[serde(default)]
    pub notes: String,
}

/// A step given either as bare text or with an explicit duration
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureStep {
    Text(String),
    Timed {
        instruction: String,
        #[serde(default)]
        time_minutes: u32,
    },
}

impl FixtureStep {
    pub fn instruction(&self) -> &str {
        match self {
            FixtureStep::Text(text) => text,
            FixtureStep::Timed { instruction, .. } => instruction,
        }
    }

    pub fn time_minutes(&self) -> u32 {
        match self {
            FixtureStep::Text(_) => 0,
            FixtureStep::Timed { time_minutes, .. } => *time_minutes,
        }
    }
}

fn default_servings() -> u32 {
    1
}

fn default_featured() -> bool {
    true
}
