use crate::analytics::CatalogStats;
use crate::api::AppState;
use crate::catalog::{CategoryView, IngredientView, RecipeDetailView, RecipeListView};
use crate::error::{AppError, Result};
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// List recipes, filtered and ordered by the query string
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<RecipeListView>>> {
    let recipes = state.catalog.list_recipes(&params).await?;
    Ok(Json(recipes))
}

/// Get a recipe by slug
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<RecipeDetailView>> {
    let recipe = state.catalog.recipe_detail(&slug).await?;
    Ok(Json(recipe))
}

/// List categories with their recipe counts
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryView>>> {
    Ok(Json(state.catalog.categories().await?))
}

/// List ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<IngredientView>>> {
    Ok(Json(state.catalog.ingredients().await?))
}

/// Catalog-wide statistics
pub async fn recipe_stats(State(state): State<AppState>) -> Result<Json<CatalogStats>> {
    Ok(Json(state.catalog.stats().await?))
}

/// Featured recipes
pub async fn featured_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeListView>>> {
    Ok(Json(state.catalog.featured().await?))
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics() -> impl IntoResponse {
    let metrics = crate::metrics::gather_metrics();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics,
    )
}

/// Unknown routes answer with the standard error body
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
