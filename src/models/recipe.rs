use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use unicode_normalization::UnicodeNormalization;
use validator::Validate;

static SLUG_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid slug strip regex"));
static SLUG_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid slug separator regex"));

/// Preparation difficulty
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// A recipe as stored in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    /// URL-safe unique identifier
    pub slug: String,
    pub description: String,
    /// URL to the recipe image
    pub image: String,
    pub category_id: u64,

    /// Preparation time in minutes
    pub prep_time: u32,
    /// Cooking time in minutes
    pub cook_time: u32,
    /// Computed once at creation; not kept in sync with prep/cook afterwards
    pub total_time: u32,
    pub difficulty: Difficulty,
    pub servings: u32,

    // Nutrition per serving
    pub calories_per_serving: u32,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: f64,

    // Dietary flags
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_dairy_free: bool,

    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Build a stored recipe from its insert payload, deriving the slug and
    /// total time when they were not supplied.
    pub fn from_new(id: u64, new: NewRecipe, now: DateTime<Utc>) -> Result<Self> {
        let slug = match new.slug {
            Some(ref slug) if !slug.trim().is_empty() => slug.clone(),
            _ => slugify(&new.name),
        };
        let total_time = match new.total_time {
            Some(total) if total > 0 => total,
            _ => new.combined_time()?,
        };

        Ok(Self {
            id,
            name: new.name,
            slug,
            description: new.description,
            image: new.image,
            category_id: new.category_id,
            prep_time: new.prep_time,
            cook_time: new.cook_time,
            total_time,
            difficulty: new.difficulty,
            servings: new.servings,
            calories_per_serving: new.calories_per_serving,
            protein_grams: new.protein_grams,
            carbs_grams: new.carbs_grams,
            fat_grams: new.fat_grams,
            fiber_grams: new.fiber_grams,
            is_vegetarian: new.is_vegetarian,
            is_vegan: new.is_vegan,
            is_gluten_free: new.is_gluten_free,
            is_dairy_free: new.is_dairy_free,
            is_featured: new.is_featured,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Insert payload for a recipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRecipe {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Derived from the name when absent
    #[serde(default)]
    #[validate(length(max = 220))]
    pub slug: Option<String>,

    pub description: String,

    #[validate(length(max = 500))]
    pub image: String,

    pub category_id: u64,

    pub prep_time: u32,

    #[serde(default)]
    pub cook_time: u32,

    /// Derived as prep + cook when absent or zero
    #[serde(default)]
    pub total_time: Option<u32>,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default = "default_servings")]
    #[validate(range(min = 1))]
    pub servings: u32,

    pub calories_per_serving: u32,

    #[validate(range(min = 0.0))]
    pub protein_grams: f64,

    #[validate(range(min = 0.0))]
    pub carbs_grams: f64,

    #[validate(range(min = 0.0))]
    pub fat_grams: f64,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fiber_grams: f64,

    #[serde(default)]
    pub is_vegetarian: bool,

    #[serde(default)]
    pub is_vegan: bool,

    #[serde(default)]
    pub is_gluten_free: bool,

    #[serde(default)]
    pub is_dairy_free: bool,

    #[serde(default)]
    pub is_featured: bool,
}

impl NewRecipe {
    /// Minimal payload; everything else takes its default
    pub fn new(name: impl Into<String>, category_id: u64) -> Self {
        Self {
            name: name.into(),
            slug: None,
            description: String::new(),
            image: String::new(),
            category_id,
            prep_time: 0,
            cook_time: 0,
            total_time: None,
            difficulty: Difficulty::Easy,
            servings: default_servings(),
            calories_per_serving: 0,
            protein_grams: 0.0,
            carbs_grams: 0.0,
            fat_grams: 0.0,
            fiber_grams: 0.0,
            is_vegetarian: false,
            is_vegan: false,
            is_gluten_free: false,
            is_dairy_free: false,
            is_featured: false,
        }
    }

    /// Prep plus cook time; a sum past `u32::MAX` minutes is rejected
    pub fn combined_time(&self) -> Result<u32> {
        self.prep_time.checked_add(self.cook_time).ok_or_else(|| {
            AppError::Validation(format!(
                "Prep time {} plus cook time {} for '{}' is out of range",
                self.prep_time, self.cook_time, self.name
            ))
        })
    }
}

fn default_servings() -> u32 {
    1
}

/// Quantity of one ingredient used by one recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    pub id: u64,
    pub recipe_id: u64,
    pub ingredient_id: u64,
    /// e.g. "2 cups", "1 tbsp"
    pub quantity: String,
    /// e.g. "chopped", "optional"
    pub notes: String,
}

/// One numbered instruction of a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeStep {
    pub id: u64,
    pub recipe_id: u64,
    pub step_number: u32,
    pub instruction: String,
    pub time_minutes: u32,
}

/// Convert a name into a URL-safe slug.
///
/// Accented letters are decomposed (NFKD) and lose their marks, any other
/// non-ASCII character is dropped, everything except word characters,
/// whitespace and hyphens is removed, and runs of whitespace or hyphens
/// collapse into a single `-`.
pub fn slugify(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&ascii, "");
    let joined = SLUG_SEPARATORS.replace_all(stripped.trim(), "-");
    joined.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Mediterranean Quinoa Power Bowl"),
            "mediterranean-quinoa-power-bowl"
        );
        assert_eq!(slugify("Omega-3 Walnut Energy Bites"), "omega-3-walnut-energy-bites");
        assert_eq!(slugify("  Mac & Cheese!  "), "mac-cheese");
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
        assert_eq!(slugify("Jalapeño Poppers"), "jalapeno-poppers");
        assert_eq!(slugify("ﬁsh tacos"), "fish-tacos");
        assert_eq!(slugify("寿司 Bowl"), "bowl");
        assert_eq!(slugify("--a  -- b__"), "a-b");
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!(Difficulty::from_str("easy").unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::from_str("hard").unwrap(), Difficulty::Hard);
        assert!(Difficulty::from_str("Hard").is_err());
        assert!(Difficulty::from_str("extreme").is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn test_from_new_derives_slug_and_total_time() {
        let mut new = NewRecipe::new("Turmeric Lentil Soup", 1);
        new.prep_time = 10;
        new.cook_time = 25;
        let recipe = Recipe::from_new(7, new, Utc::now()).unwrap();

        assert_eq!(recipe.slug, "turmeric-lentil-soup");
        assert_eq!(recipe.total_time, 35);
    }

    #[test]
    fn test_from_new_keeps_explicit_values() {
        let mut new = NewRecipe::new("Soup", 1);
        new.slug = Some("custom-soup".to_string());
        new.prep_time = 10;
        new.cook_time = 5;
        new.total_time = Some(60);
        let recipe = Recipe::from_new(1, new, Utc::now()).unwrap();

        assert_eq!(recipe.slug, "custom-soup");
        assert_eq!(recipe.total_time, 60);
    }

    #[test]
    fn test_from_new_rejects_time_overflow() {
        let mut new = NewRecipe::new("Slow Stew", 1);
        new.prep_time = u32::MAX;
        new.cook_time = 1;

        let err = Recipe::from_new(1, new.clone(), Utc::now()).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        // an explicit total skips the derivation
        new.total_time = Some(90);
        assert_eq!(Recipe::from_new(1, new, Utc::now()).unwrap().total_time, 90);
    }

    #[test]
    fn test_zero_servings_rejected() {
        let mut new = NewRecipe::new("Soup", 1);
        new.servings = 0;
        assert!(new.validate().is_err());
    }

    #[test]
    fn test_negative_macros_rejected() {
        let mut new = NewRecipe::new("Soup", 1);
        new.fat_grams = -1.0;
        assert!(new.validate().is_err());
    }
}
