//! Catalog read model: the service that answers every endpoint and the
//! response shapes it assembles.

pub mod service;
pub mod views;

pub use service::{CatalogService, FEATURED_LIMIT};
pub use views::{
    CategoryView, IngredientView, RecipeDetailView, RecipeIngredientView, RecipeListView,
    RecipeRelations, RecipeStepView, ViewContext,
};
