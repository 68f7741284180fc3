//! Recipe listing query engine
//!
//! - [`filter`]: compiles query parameters into a [`Predicate`]
//! - [`search`]: case-insensitive substring matching, including the
//!   set-based `ingredients` token resolution
//! - [`ordering`]: the `ordering` parameter

pub mod filter;
pub mod ordering;
pub mod search;

pub use filter::{compile, Candidate, FilterContext, FilterStep, Predicate, FILTER_STEPS};
pub use ordering::{OrderField, RecipeOrdering, SortKey};
pub use search::{parse_ingredient_tokens, parse_search_terms, IngredientIndex};
