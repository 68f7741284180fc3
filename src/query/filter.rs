//! Compiles recipe-list query parameters into a single predicate.
//!
//! Each recognized parameter owns one step in [`FILTER_STEPS`]. A step is a
//! pure function from the predicate built so far and the raw parameter value
//! to a new predicate; steps run in table order and combine with logical AND.
//! Parameters that are absent, empty, or not understood leave the predicate
//! unchanged.

use crate::models::{Difficulty, Recipe};
use crate::query::search::{
    contains_ci, matches_search_term, parse_ingredient_tokens, parse_search_terms, IngredientIndex,
};
use std::collections::HashMap;
use std::str::FromStr;

/// A recipe with the related values filters inspect
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub recipe: &'a Recipe,
    pub category_name: &'a str,
}

type MatchFn = dyn Fn(&Candidate<'_>) -> bool + Send + Sync;

/// Composable boolean restriction over recipes
pub struct Predicate(Box<MatchFn>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Candidate<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    /// Keeps every recipe
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Keeps no recipe
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Logical AND of both predicates
    pub fn and(self, other: Predicate) -> Self {
        Self::new(move |candidate| self.matches(candidate) && other.matches(candidate))
    }

    pub fn matches(&self, candidate: &Candidate<'_>) -> bool {
        (self.0)(candidate)
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Predicate")
    }
}

/// Data some steps need beyond the parameter value
pub struct FilterContext<'a> {
    pub ingredients: &'a IngredientIndex,
}

pub type FilterStepFn = fn(Predicate, &str, &FilterContext<'_>) -> Predicate;

/// One query parameter and the step that applies it
pub struct FilterStep {
    pub param: &'static str,
    pub apply: FilterStepFn,
}

pub static FILTER_STEPS: [FilterStep; 8] = [
    FilterStep {
        param: "category",
        apply: category_step,
    },
    FilterStep {
        param: "max_time",
        apply: max_time_step,
    },
    FilterStep {
        param: "difficulty",
        apply: difficulty_step,
    },
    FilterStep {
        param: "ingredients",
        apply: ingredients_step,
    },
    FilterStep {
        param: "vegetarian",
        apply: vegetarian_step,
    },
    FilterStep {
        param: "vegan",
        apply: vegan_step,
    },
    FilterStep {
        param: "gluten_free",
        apply: gluten_free_step,
    },
    FilterStep {
        param: "search",
        apply: search_step,
    },
];

/// Build the predicate for a set of query parameters
pub fn compile(params: &HashMap<String, String>, ctx: &FilterContext<'_>) -> Predicate {
    FILTER_STEPS
        .iter()
        .fold(Predicate::always(), |predicate, step| match params.get(step.param) {
            Some(value) => (step.apply)(predicate, value, ctx),
            None => predicate,
        })
}

/// Category name contains the value; `all` keeps everything
pub fn category_step(predicate: Predicate, value: &str, _ctx: &FilterContext<'_>) -> Predicate {
    if value.is_empty() || value == "all" {
        return predicate;
    }
    let needle = value.to_lowercase();
    predicate.and(Predicate::new(move |c| contains_ci(c.category_name, &needle)))
}

/// Total time at most the value; unparseable values skip the filter
pub fn max_time_step(predicate: Predicate, value: &str, _ctx: &FilterContext<'_>) -> Predicate {
    if value.is_empty() {
        return predicate;
    }
    match value.trim().parse::<u32>() {
        Ok(max_time) => predicate.and(Predicate::new(move |c| c.recipe.total_time <= max_time)),
        Err(_) => {
            tracing::debug!(max_time = %value, "Ignoring non-numeric max_time");
            predicate
        }
    }
}

/// Exact difficulty; a value naming no difficulty matches nothing
pub fn difficulty_step(predicate: Predicate, value: &str, _ctx: &FilterContext<'_>) -> Predicate {
    if value.is_empty() {
        return predicate;
    }
    match Difficulty::from_str(value) {
        Ok(difficulty) => {
            predicate.and(Predicate::new(move |c| c.recipe.difficulty == difficulty))
        }
        Err(_) => predicate.and(Predicate::never()),
    }
}

/// Every comma-separated token must match an ingredient name, the recipe
/// name, or the description
pub fn ingredients_step(predicate: Predicate, value: &str, ctx: &FilterContext<'_>) -> Predicate {
    let tokens = parse_ingredient_tokens(value);
    if tokens.is_empty() {
        return predicate;
    }
    let matched = ctx.ingredients.recipes_matching_all(&tokens);
    predicate.and(Predicate::new(move |c| matched.contains(&c.recipe.id)))
}

fn flag_step(predicate: Predicate, value: &str, flag: fn(&Recipe) -> bool) -> Predicate {
    if value == "true" {
        predicate.and(Predicate::new(move |c| flag(c.recipe)))
    } else {
        predicate
    }
}

pub fn vegetarian_step(predicate: Predicate, value: &str, _ctx: &FilterContext<'_>) -> Predicate {
    flag_step(predicate, value, |r| r.is_vegetarian)
}

pub fn vegan_step(predicate: Predicate, value: &str, _ctx: &FilterContext<'_>) -> Predicate {
    flag_step(predicate, value, |r| r.is_vegan)
}

pub fn gluten_free_step(predicate: Predicate, value: &str, _ctx: &FilterContext<'_>) -> Predicate {
    flag_step(predicate, value, |r| r.is_gluten_free)
}

/// Every search term must occur in the name, description or category name
pub fn search_step(predicate: Predicate, value: &str, _ctx: &FilterContext<'_>) -> Predicate {
    let terms = parse_search_terms(value);
    if terms.is_empty() {
        return predicate;
    }
    predicate.and(Predicate::new(move |c| {
        terms.iter().all(|term| matches_search_term(c, term))
    }))
}
