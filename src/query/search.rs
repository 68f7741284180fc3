//! Case-insensitive substring matching across recipes and their ingredients

use crate::models::{Ingredient, Recipe, RecipeIngredient};
use crate::query::Candidate;
use std::collections::{HashMap, HashSet};

/// Case-insensitive containment; `needle` must already be lower-cased
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Split an `ingredients` value on commas, trimming and dropping empty entries
pub fn parse_ingredient_tokens(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a `search` value into lower-cased terms on whitespace and commas
pub fn parse_search_terms(value: &str) -> Vec<String> {
    value
        .replace('\0', "")
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when the lower-cased term occurs in the recipe name, description or
/// category name
pub fn matches_search_term(candidate: &Candidate<'_>, term: &str) -> bool {
    contains_ci(&candidate.recipe.name, term)
        || contains_ci(&candidate.recipe.description, term)
        || contains_ci(candidate.category_name, term)
}

/// Lower-cased text of every recipe and of the ingredient names each recipe
/// uses, for resolving `ingredients` tokens to recipe ids.
#[derive(Debug, Default)]
pub struct IngredientIndex {
    recipe_text: Vec<(u64, String, String)>,
    ingredient_usage: Vec<(u64, String)>,
}

impl IngredientIndex {
    pub fn build(
        recipes: &[Recipe],
        recipe_ingredients: &[RecipeIngredient],
        ingredients: &[Ingredient],
    ) -> Self {
        let names: HashMap<u64, String> = ingredients
            .iter()
            .map(|i| (i.id, i.name.to_lowercase()))
            .collect();

        let recipe_text = recipes
            .iter()
            .map(|r| (r.id, r.name.to_lowercase(), r.description.to_lowercase()))
            .collect();

        let ingredient_usage = recipe_ingredients
            .iter()
            .filter_map(|ri| names.get(&ri.ingredient_id).map(|n| (ri.recipe_id, n.clone())))
            .collect();

        Self {
            recipe_text,
            ingredient_usage,
        }
    }

    /// Recipes whose name, description or any ingredient name contains the token
    pub fn recipes_matching(&self, token: &str) -> HashSet<u64> {
        let token = token.to_lowercase();

        let by_ingredient = self
            .ingredient_usage
            .iter()
            .filter(|(_, name)| name.contains(&token))
            .map(|(recipe_id, _)| *recipe_id);

        let by_text = self
            .recipe_text
            .iter()
            .filter(|(_, name, description)| name.contains(&token) || description.contains(&token))
            .map(|(recipe_id, _, _)| *recipe_id);

        by_ingredient.chain(by_text).collect()
    }

    /// Recipes matching every token, each token possibly through a different
    /// field. With no tokens every indexed recipe matches.
    pub fn recipes_matching_all(&self, tokens: &[String]) -> HashSet<u64> {
        let mut tokens = tokens.iter();
        let Some(first) = tokens.next() else {
            return self.recipe_text.iter().map(|(id, _, _)| *id).collect();
        };

        let mut matched = self.recipes_matching(first);
        for token in tokens {
            if matched.is_empty() {
                break;
            }
            let next = self.recipes_matching(token);
            matched.retain(|id| next.contains(id));
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRecipe;
    use chrono::Utc;

    fn recipe(id: u64, name: &str, description: &str) -> Recipe {
        let mut new = NewRecipe::new(name, 1);
        new.description = description.to_string();
        Recipe::from_new(id, new, Utc::now()).unwrap()
    }

    fn ingredient(id: u64, name: &str) -> Ingredient {
        Ingredient {
            id,
            name: name.to_string(),
            emoji: String::new(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    fn usage(id: u64, recipe_id: u64, ingredient_id: u64) -> RecipeIngredient {
        RecipeIngredient {
            id,
            recipe_id,
            ingredient_id,
            quantity: "1".to_string(),
            notes: String::new(),
        }
    }

    fn index() -> IngredientIndex {
        let recipes = vec![
            recipe(1, "Avocado Toast", "Crunchy bread"),
            recipe(2, "Chickpea Salad", "Bright with lemon juice"),
            recipe(3, "Green Smoothie", "Spinach and banana"),
        ];
        let ingredients = vec![
            ingredient(10, "avocado"),
            ingredient(11, "tomatoes"),
            ingredient(12, "Lemon"),
            ingredient(13, "chickpeas"),
        ];
        let usages = vec![
            usage(100, 1, 10),
            usage(101, 1, 11),
            usage(102, 2, 13),
            usage(103, 2, 10),
            usage(104, 2, 12),
        ];
        IngredientIndex::build(&recipes, &usages, &ingredients)
    }

    #[test]
    fn test_parse_ingredient_tokens() {
        assert_eq!(
            parse_ingredient_tokens(" avocado, ,lemon ,,"),
            vec!["avocado".to_string(), "lemon".to_string()]
        );
        assert!(parse_ingredient_tokens(" , ").is_empty());
    }

    #[test]
    fn test_parse_search_terms() {
        assert_eq!(
            parse_search_terms("Quinoa  BOWL,vegan"),
            vec!["quinoa", "bowl", "vegan"]
        );
        assert!(parse_search_terms("   ").is_empty());
    }

    #[test]
    fn test_token_matches_any_field() {
        let index = index();
        // ingredient name
        assert_eq!(index.recipes_matching("tomato"), HashSet::from([1]));
        // description, case-insensitive
        assert_eq!(index.recipes_matching("BANANA"), HashSet::from([3]));
        // recipe name and ingredient name on different recipes
        assert_eq!(index.recipes_matching("avocado"), HashSet::from([1, 2]));
    }

    #[test]
    fn test_tokens_intersect() {
        let index = index();
        let tokens = vec!["avocado".to_string(), "lemon".to_string()];
        assert_eq!(index.recipes_matching_all(&tokens), HashSet::from([2]));

        let none = vec!["avocado".to_string(), "spinach".to_string()];
        assert!(index.recipes_matching_all(&none).is_empty());
    }

    #[test]
    fn test_no_tokens_matches_everything() {
        assert_eq!(index().recipes_matching_all(&[]).len(), 3);
    }
}
