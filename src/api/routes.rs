use crate::api::{handlers, AppState};
use crate::metrics::track_metrics;
use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
///
/// Catalog routes answer both with and without the trailing slash.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health and metrics
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        // Recipes
        .route("/recipes", get(handlers::list_recipes))
        .route("/recipes/", get(handlers::list_recipes))
        .route("/recipes/:slug", get(handlers::get_recipe))
        .route("/recipes/:slug/", get(handlers::get_recipe))
        // Reference data
        .route("/categories", get(handlers::list_categories))
        .route("/categories/", get(handlers::list_categories))
        .route("/ingredients", get(handlers::list_ingredients))
        .route("/ingredients/", get(handlers::list_ingredients))
        // Aggregates
        .route("/stats", get(handlers::recipe_stats))
        .route("/stats/", get(handlers::recipe_stats))
        .route("/featured", get(handlers::featured_recipes))
        .route("/featured/", get(handlers::featured_recipes))
        .fallback(handlers::not_found)
        // Add state
        .with_state(state)
        // Add middleware
        .layer(middleware::from_fn(track_metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
