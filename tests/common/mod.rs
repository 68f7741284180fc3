//! Shared fixtures for the integration tests
#![allow(dead_code)]

use recipe_catalog::{
    catalog::{CatalogService, RecipeListView},
    seed::{seed_catalog, SeedFixture},
    state::{create_in_memory_store, CatalogStore},
};
use std::collections::HashMap;
use std::sync::Arc;

/// Four recipes across three categories plus an empty "Wraps" category.
///
/// | recipe                 | category  | total | difficulty | kcal | veg | vegan | gf  | featured |
/// |------------------------|-----------|-------|------------|------|-----|-------|-----|----------|
/// | Avocado Tomato Salad   | Salads    | 10    | easy       | 300  | yes | yes   | yes | yes      |
/// | Chickpea Avocado Salad | Salads    | 15    | easy       | 350  | yes | no    | no  | yes      |
/// | Turmeric Lentil Soup   | Soups     | 35    | medium     | 298  | yes | yes   | yes | yes      |
/// | Banana Smoothie        | Smoothies | 5     | easy       | 240  | no  | no    | no  | no       |
pub const TEST_FIXTURE: &str = r##"
[[categories]]
name = "Salads"
emoji = "🥗"

[[categories]]
name = "Soups"
emoji = "🍲"

[[categories]]
name = "Smoothies"
emoji = "🥤"

[[categories]]
name = "Wraps"
emoji = "🌯"

[[ingredients]]
name = "avocado"
emoji = "🥑"

[[ingredients]]
name = "tomatoes"
emoji = "🍅"

[[ingredients]]
name = "lemon"
emoji = "🍋"

[[ingredients]]
name = "chickpeas"

[[ingredients]]
name = "red lentils"

[[ingredients]]
name = "spinach"
emoji = "🥬"

[[ingredients]]
name = "banana"
emoji = "🍌"

[[tags]]
name = "vegan"
color = "#059669"

[[tags]]
name = "quick"
color = "#3b82f6"

[[recipes]]
name = "Avocado Tomato Salad"
description = "Fresh and crunchy"
category = "Salads"
prep_time = 10
calories_per_serving = 300
is_vegetarian = true
is_vegan = true
is_gluten_free = true
ingredients = [
    { name = "avocado", quantity = "1 ripe" },
    { name = "tomatoes", quantity = "2 medium" },
]
steps = ["Dice", "Toss"]
tags = ["quick", "vegan"]

[[recipes]]
name = "Chickpea Avocado Salad"
description = "Bright with lemon juice"
category = "Salads"
prep_time = 15
calories_per_serving = 350
is_vegetarian = true
ingredients = [
    { name = "chickpeas", quantity = "1 can" },
    { name = "avocado", quantity = "1 large" },
]
steps = ["Rinse chickpeas", "Mash avocado", "Combine"]
tags = ["quick"]

[[recipes]]
name = "Turmeric Lentil Soup"
description = "Warming and golden"
category = "Soups"
prep_time = 10
cook_time = 25
difficulty = "medium"
servings = 2
calories_per_serving = 298
is_vegetarian = true
is_vegan = true
is_gluten_free = true
ingredients = [
    { name = "red lentils", quantity = "1 cup" },
    { name = "spinach", quantity = "2 cups", notes = "baby leaves" },
    { name = "lemon", quantity = "1/2" },
    { name = "saffron", quantity = "a pinch" },
]
steps = [
    "Rinse lentils",
    { instruction = "Sweat aromatics", time_minutes = 5 },
    "Add turmeric",
    { instruction = "Simmer", time_minutes = 20 },
    "Stir in spinach and lemon",
]
tags = ["vegan", "comforting"]

[[recipes]]
name = "Banana Smoothie"
description = "Creamy breakfast drink"
category = "Smoothies"
prep_time = 5
calories_per_serving = 240
is_featured = false
ingredients = [{ name = "banana", quantity = "1" }]
steps = ["Blend"]
"##;

pub fn test_fixture() -> SeedFixture {
    SeedFixture::parse(TEST_FIXTURE).expect("test fixture parses")
}

pub async fn seeded_store() -> Arc<dyn CatalogStore> {
    let store = create_in_memory_store();
    seed_catalog(store.as_ref(), &test_fixture())
        .await
        .expect("test fixture seeds");
    store
}

pub async fn seeded_catalog() -> CatalogService {
    CatalogService::new(seeded_store().await)
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn names(recipes: &[RecipeListView]) -> Vec<&str> {
    recipes.iter().map(|r| r.name.as_str()).collect()
}
