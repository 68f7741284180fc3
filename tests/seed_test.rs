//! Seeding is idempotent on both store backends

mod common;

use common::test_fixture;
use recipe_catalog::{
    seed::{seed_catalog, SeedFixture},
    state::{CatalogStore, InMemoryStore, SledStore},
};
use std::sync::Arc;
use tempfile::TempDir;

async fn seed_twice<S: CatalogStore + 'static>(store: Arc<S>, fixture: &SeedFixture) {
    let first = seed_catalog(store.as_ref(), fixture).await.unwrap();
    let after_first = store.counts().await.unwrap();
    assert!(first.total_created() > 0);

    let second = seed_catalog(store.as_ref(), fixture).await.unwrap();
    let after_second = store.counts().await.unwrap();

    assert_eq!(second.total_created(), 0);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_in_memory_seed_is_idempotent() {
    seed_twice(Arc::new(InMemoryStore::new()), &test_fixture()).await;
}

#[tokio::test]
async fn test_sled_seed_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledStore::new(temp_dir.path()).unwrap());
    seed_twice(store, &SeedFixture::builtin().unwrap()).await;
}

#[tokio::test]
async fn test_builtin_seed_row_counts() {
    let store = InMemoryStore::new();
    seed_catalog(&store, &SeedFixture::builtin().unwrap())
        .await
        .unwrap();

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.categories, 6);
    assert_eq!(counts.ingredients, 20);
    assert_eq!(counts.tags, 8);
    assert_eq!(counts.recipes, 6);
    assert_eq!(counts.recipe_steps, 32);
}

#[tokio::test]
async fn test_sled_reseed_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = SeedFixture::builtin().unwrap();

    let before = {
        let store = SledStore::new(temp_dir.path()).unwrap();
        seed_catalog(&store, &fixture).await.unwrap();
        store.flush().await.unwrap();
        store.counts().await.unwrap()
    };

    let store = SledStore::new(temp_dir.path()).unwrap();
    let report = seed_catalog(&store, &fixture).await.unwrap();
    assert_eq!(report.total_created(), 0);
    assert_eq!(store.counts().await.unwrap(), before);
}

#[tokio::test]
async fn test_existing_recipe_keeps_its_children() {
    let store = InMemoryStore::new();
    seed_catalog(&store, &test_fixture()).await.unwrap();

    // Same recipe name with different children: nothing is added
    let changed = SeedFixture::parse(
        r#"
        [[ingredients]]
        name = "chili"

        [[recipes]]
        name = "Banana Smoothie"
        category = "Smoothies"
        ingredients = [{ name = "chili", quantity = "1" }]
        steps = ["Blend", "Garnish", "Serve"]
        "#,
    )
    .unwrap();
    let report = seed_catalog(&store, &changed).await.unwrap();

    assert_eq!(report.ingredients, 1);
    assert_eq!(report.recipes, 0);
    assert_eq!(report.recipe_steps, 0);

    let smoothie = store
        .find_recipe_by_name("Banana Smoothie")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(store.steps_for(smoothie.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fixture_file_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.toml");
    std::fs::write(&path, common::TEST_FIXTURE).unwrap();

    let fixture = SeedFixture::load(Some(&path)).unwrap();
    assert_eq!(fixture.recipes.len(), 4);
    assert!(SeedFixture::load(Some(&temp_dir.path().join("missing.toml"))).is_err());
}
