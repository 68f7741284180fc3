//! HTTP surface: routes, query parameter handling and error bodies

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::seeded_catalog;
use recipe_catalog::api::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Router {
    build_router(AppState::new(Arc::new(seeded_catalog().await)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app().await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_list_recipes_with_and_without_slash() {
    let (status, with_slash) = get(app().await, "/recipes/").await;
    assert_eq!(status, StatusCode::OK);
    let (_, without_slash) = get(app().await, "/recipes").await;

    assert_eq!(with_slash.as_array().unwrap().len(), 4);
    assert_eq!(with_slash, without_slash);
}

#[tokio::test]
async fn test_query_params_reach_filters() {
    let (status, body) = get(
        app().await,
        "/recipes/?ingredients=avocado,lemon&category=all&max_time=abc",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let recipes = body.as_array().unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["name"], "Chickpea Avocado Salad");
    assert_eq!(recipes[0]["category"], "Salads");
    assert_eq!(recipes[0]["difficulty"], "easy");
}

#[tokio::test]
async fn test_url_encoded_search() {
    let (_, body) = get(app().await, "/recipes/?search=lentil%20soup").await;
    let recipes = body.as_array().unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["slug"], "turmeric-lentil-soup");
}

#[tokio::test]
async fn test_recipe_detail() {
    let (status, body) = get(app().await, "/recipes/turmeric-lentil-soup/").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["name"], "Turmeric Lentil Soup");
    assert_eq!(body["total_time"], 35);
    assert_eq!(body["prep_time"], 10);
    assert_eq!(body["category"], "Soups");
    assert_eq!(body["tags"], serde_json::json!(["vegan"]));

    let ingredients = body["recipe_ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 3);
    assert_eq!(ingredients[0]["ingredient_name"], "red lentils");
    assert_eq!(ingredients[1]["notes"], "baby leaves");
    assert_eq!(ingredients[1]["ingredient_emoji"], "🥬");

    let steps: Vec<u64> = body["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["step_number"].as_u64().unwrap())
        .collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 5]);
    assert_eq!(body["steps"][3]["time_minutes"], 20);
}

#[tokio::test]
async fn test_recipe_detail_without_slash() {
    let (status, body) = get(app().await, "/recipes/banana-smoothie").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_featured"], false);
}

#[tokio::test]
async fn test_unknown_slug_returns_error_body() {
    let (status, body) = get(app().await, "/recipes/does-not-exist/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["status"], 404);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("does-not-exist"));
}

#[tokio::test]
async fn test_unknown_route_returns_error_body() {
    let (status, body) = get(app().await, "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_categories_ingredients_stats_featured() {
    let (status, categories) = get(app().await, "/categories/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories[0]["name"], "Salads");
    assert_eq!(categories[0]["recipe_count"], 2);

    let (status, ingredients) = get(app().await, "/ingredients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ingredients.as_array().unwrap().len(), 7);

    let (status, stats) = get(app().await, "/stats/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["vegetarian_percentage"], 75);

    let (status, featured) = get(app().await, "/featured/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(featured.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let _ = recipe_catalog::metrics::init_metrics();
    let app = app().await;

    let (status, _) = get(app.clone(), "/stats/").await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("recipe_catalog_catalog_queries_total"));
    assert!(text.contains("recipe_catalog_http_requests_total"));
}
