//! Response shapes for the catalog endpoints

use crate::models::{
    Category, Difficulty, Ingredient, Recipe, RecipeIngredient, RecipeStep, RecipeTag, Tag,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name lookups shared by every list-view row of one response
#[derive(Debug, Default)]
pub struct ViewContext {
    category_names: HashMap<u64, String>,
    tag_names: HashMap<u64, String>,
    recipe_tags: HashMap<u64, Vec<u64>>,
}

impl ViewContext {
    /// `recipe_tags` must be in link insertion order
    pub fn new(categories: &[Category], tags: &[Tag], recipe_tags: &[RecipeTag]) -> Self {
        let mut links: HashMap<u64, Vec<u64>> = HashMap::new();
        for link in recipe_tags {
            links.entry(link.recipe_id).or_default().push(link.tag_id);
        }

        Self {
            category_names: categories.iter().map(|c| (c.id, c.name.clone())).collect(),
            tag_names: tags.iter().map(|t| (t.id, t.name.clone())).collect(),
            recipe_tags: links,
        }
    }

    pub fn category_name(&self, category_id: u64) -> &str {
        self.category_names
            .get(&category_id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn tag_names(&self, recipe_id: u64) -> Vec<String> {
        self.recipe_tags
            .get(&recipe_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.tag_names.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Compact recipe representation used by listings and `/featured/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeListView {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub tags: Vec<String>,
    pub total_time: u32,
    pub difficulty: Difficulty,
    pub calories_per_serving: u32,
    pub servings: u32,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: f64,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_dairy_free: bool,
    pub is_featured: bool,
}

impl RecipeListView {
    pub fn from_recipe(recipe: &Recipe, ctx: &ViewContext) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            slug: recipe.slug.clone(),
            description: recipe.description.clone(),
            image: recipe.image.clone(),
            category: ctx.category_name(recipe.category_id).to_string(),
            tags: ctx.tag_names(recipe.id),
            total_time: recipe.total_time,
            difficulty: recipe.difficulty,
            calories_per_serving: recipe.calories_per_serving,
            servings: recipe.servings,
            protein_grams: recipe.protein_grams,
            carbs_grams: recipe.carbs_grams,
            fat_grams: recipe.fat_grams,
            fiber_grams: recipe.fiber_grams,
            is_vegetarian: recipe.is_vegetarian,
            is_vegan: recipe.is_vegan,
            is_gluten_free: recipe.is_gluten_free,
            is_dairy_free: recipe.is_dairy_free,
            is_featured: recipe.is_featured,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredientView {
    pub ingredient_name: String,
    pub ingredient_emoji: String,
    pub quantity: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStepView {
    pub step_number: u32,
    pub instruction: String,
    pub time_minutes: u32,
}

impl From<&RecipeStep> for RecipeStepView {
    fn from(step: &RecipeStep) -> Self {
        Self {
            step_number: step.step_number,
            instruction: step.instruction.clone(),
            time_minutes: step.time_minutes,
        }
    }
}

/// Full recipe with its ingredients, steps and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetailView {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub total_time: u32,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub calories_per_serving: u32,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: f64,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_dairy_free: bool,
    pub recipe_ingredients: Vec<RecipeIngredientView>,
    pub steps: Vec<RecipeStepView>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Related rows of a single recipe, already loaded from the store
pub struct RecipeRelations<'a> {
    pub category: Option<&'a Category>,
    /// Insertion order
    pub ingredients: &'a [RecipeIngredient],
    pub ingredient_lookup: &'a [Ingredient],
    /// Ascending step number
    pub steps: &'a [RecipeStep],
    /// Link insertion order
    pub tags: Vec<String>,
}

impl RecipeDetailView {
    pub fn assemble(recipe: &Recipe, relations: RecipeRelations<'_>) -> Self {
        let ingredients: HashMap<u64, &Ingredient> = relations
            .ingredient_lookup
            .iter()
            .map(|i| (i.id, i))
            .collect();

        let recipe_ingredients = relations
            .ingredients
            .iter()
            .map(|ri| {
                let ingredient = ingredients.get(&ri.ingredient_id);
                RecipeIngredientView {
                    ingredient_name: ingredient.map(|i| i.name.clone()).unwrap_or_default(),
                    ingredient_emoji: ingredient.map(|i| i.emoji.clone()).unwrap_or_default(),
                    quantity: ri.quantity.clone(),
                    notes: ri.notes.clone(),
                }
            })
            .collect();

        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            slug: recipe.slug.clone(),
            description: recipe.description.clone(),
            image: recipe.image.clone(),
            category: relations
                .category
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time: recipe.total_time,
            difficulty: recipe.difficulty,
            servings: recipe.servings,
            calories_per_serving: recipe.calories_per_serving,
            protein_grams: recipe.protein_grams,
            carbs_grams: recipe.carbs_grams,
            fat_grams: recipe.fat_grams,
            fiber_grams: recipe.fiber_grams,
            is_vegetarian: recipe.is_vegetarian,
            is_vegan: recipe.is_vegan,
            is_gluten_free: recipe.is_gluten_free,
            is_dairy_free: recipe.is_dairy_free,
            recipe_ingredients,
            steps: relations.steps.iter().map(RecipeStepView::from).collect(),
            tags: relations.tags,
            is_featured: recipe.is_featured,
            created_at: recipe.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub recipe_count: u64,
}

impl CategoryView {
    pub fn new(category: &Category, recipe_count: u64) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            emoji: category.emoji.clone(),
            recipe_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientView {
    pub id: u64,
    pub name: String,
    pub emoji: String,
    pub description: String,
}

impl From<&Ingredient> for IngredientView {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            emoji: ingredient.emoji.clone(),
            description: ingredient.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCategory, NewIngredient, NewRecipe, NewTag};

    fn fixtures() -> (Recipe, Category, Vec<Tag>, Vec<RecipeTag>) {
        let now = Utc::now();
        let category = Category::from_new(1, NewCategory::new("Salads"), now);
        let recipe = Recipe::from_new(5, NewRecipe::new("Quinoa Bowl", 1), now).unwrap();
        let tags = vec![
            Tag::from_new(20, NewTag::new("Vegan")),
            Tag::from_new(21, NewTag::new("Quick")),
        ];
        let links = vec![
            RecipeTag {
                id: 30,
                recipe_id: 5,
                tag_id: 21,
            },
            RecipeTag {
                id: 31,
                recipe_id: 5,
                tag_id: 20,
            },
        ];
        (recipe, category, tags, links)
    }

    #[test]
    fn test_list_view_names_category_and_tags() {
        let (recipe, category, tags, links) = fixtures();
        let ctx = ViewContext::new(&[category], &tags, &links);

        let view = RecipeListView::from_recipe(&recipe, &ctx);
        assert_eq!(view.category, "Salads");
        assert_eq!(view.tags, vec!["Quick".to_string(), "Vegan".to_string()]);
        assert_eq!(view.slug, "quinoa-bowl");
    }

    #[test]
    fn test_list_view_serialized_fields() {
        let (recipe, category, tags, links) = fixtures();
        let ctx = ViewContext::new(&[category], &tags, &links);
        let json = serde_json::to_value(RecipeListView::from_recipe(&recipe, &ctx)).unwrap();

        assert_eq!(json["difficulty"], "easy");
        assert!(json.get("prep_time").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_detail_view_keeps_row_order() {
        let (recipe, category, _, _) = fixtures();
        let now = Utc::now();
        let ingredient = Ingredient::from_new(
            40,
            NewIngredient::new("quinoa").with_emoji("🌾"),
            now,
        );
        let rows = vec![
            RecipeIngredient {
                id: 50,
                recipe_id: 5,
                ingredient_id: 40,
                quantity: "1 cup".to_string(),
                notes: "rinsed".to_string(),
            },
            RecipeIngredient {
                id: 51,
                recipe_id: 5,
                ingredient_id: 99,
                quantity: "pinch".to_string(),
                notes: String::new(),
            },
        ];
        let steps = vec![
            RecipeStep {
                id: 60,
                recipe_id: 5,
                step_number: 1,
                instruction: "Rinse".to_string(),
                time_minutes: 2,
            },
            RecipeStep {
                id: 61,
                recipe_id: 5,
                step_number: 2,
                instruction: "Simmer".to_string(),
                time_minutes: 15,
            },
        ];

        let view = RecipeDetailView::assemble(
            &recipe,
            RecipeRelations {
                category: Some(&category),
                ingredients: &rows,
                ingredient_lookup: std::slice::from_ref(&ingredient),
                steps: &steps,
                tags: vec!["Vegan".to_string()],
            },
        );

        assert_eq!(view.category, "Salads");
        assert_eq!(view.recipe_ingredients.len(), 2);
        assert_eq!(view.recipe_ingredients[0].ingredient_name, "quinoa");
        assert_eq!(view.recipe_ingredients[0].ingredient_emoji, "🌾");
        assert_eq!(view.recipe_ingredients[1].ingredient_name, "");
        let numbers: Vec<u32> = view.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}
