//! Catalog-wide statistics over the full, unfiltered recipe set

use crate::analytics::statistics::{percentage, rounded_mean};
use crate::models::{Category, Recipe};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of recipes referencing one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub recipe_count: u64,
}

/// Aggregate statistics served by `/stats/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_recipes: u64,
    pub avg_time_minutes: i64,
    pub avg_calories: i64,
    pub vegetarian_percentage: i64,
    pub categories: Vec<CategoryCount>,
}

/// Recipe count keyed by category id; categories without recipes are absent
pub fn recipe_counts_by_category(recipes: &[Recipe]) -> HashMap<u64, u64> {
    let mut counts = HashMap::new();
    for recipe in recipes {
        *counts.entry(recipe.category_id).or_insert(0) += 1;
    }
    counts
}

/// Compute statistics over every recipe. `categories` should be in display
/// order; every category is reported, including those with no recipes.
pub fn compute_stats(recipes: &[Recipe], categories: &[Category]) -> CatalogStats {
    let total_recipes = recipes.len() as u64;
    let vegetarian = recipes.iter().filter(|r| r.is_vegetarian).count() as u64;
    let counts = recipe_counts_by_category(recipes);

    CatalogStats {
        total_recipes,
        avg_time_minutes: rounded_mean(recipes.iter().map(|r| f64::from(r.total_time))),
        avg_calories: rounded_mean(recipes.iter().map(|r| f64::from(r.calories_per_serving))),
        vegetarian_percentage: percentage(vegetarian, total_recipes),
        categories: categories
            .iter()
            .map(|c| CategoryCount {
                name: c.name.clone(),
                recipe_count: counts.get(&c.id).copied().unwrap_or(0),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCategory, NewRecipe};
    use chrono::Utc;

    fn recipe(id: u64, category_id: u64, total_time: u32, calories: u32, veg: bool) -> Recipe {
        let mut new = NewRecipe::new(format!("Recipe {}", id), category_id);
        new.total_time = Some(total_time);
        new.calories_per_serving = calories;
        new.is_vegetarian = veg;
        Recipe::from_new(id, new, Utc::now()).unwrap()
    }

    fn category(id: u64, name: &str) -> Category {
        Category::from_new(id, NewCategory::new(name), Utc::now())
    }

    #[test]
    fn test_empty_catalog() {
        let stats = compute_stats(&[], &[category(1, "Soups")]);
        assert_eq!(stats.total_recipes, 0);
        assert_eq!(stats.avg_time_minutes, 0);
        assert_eq!(stats.avg_calories, 0);
        assert_eq!(stats.vegetarian_percentage, 0);
        assert_eq!(
            stats.categories,
            vec![CategoryCount {
                name: "Soups".to_string(),
                recipe_count: 0
            }]
        );
    }

    #[test]
    fn test_stats_values() {
        let recipes = vec![
            recipe(10, 1, 25, 385, true),
            recipe(11, 1, 15, 342, true),
            recipe(12, 2, 35, 298, true),
            recipe(13, 2, 5, 245, false),
        ];
        let categories = vec![category(1, "Salads"), category(2, "Soups"), category(3, "Wraps")];

        let stats = compute_stats(&recipes, &categories);
        assert_eq!(stats.total_recipes, 4);
        // (25 + 15 + 35 + 5) / 4 = 20
        assert_eq!(stats.avg_time_minutes, 20);
        // (385 + 342 + 298 + 245) / 4 = 317.5 -> 318 (ties to even)
        assert_eq!(stats.avg_calories, 318);
        assert_eq!(stats.vegetarian_percentage, 75);
        let counts: Vec<u64> = stats.categories.iter().map(|c| c.recipe_count).collect();
        assert_eq!(counts, vec![2, 2, 0]);
    }
}
