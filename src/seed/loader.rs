use crate::error::{AppError, Result};
use crate::metrics::SEEDED_ROWS_TOTAL;
use crate::seed::SeedFixture;
use crate::state::CatalogStore;
use serde::Serialize;

/// Rows created by one seeding run; all zero when re-run on a seeded store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub categories: usize,
    pub ingredients: usize,
    pub tags: usize,
    pub recipes: usize,
    pub recipe_ingredients: usize,
    pub recipe_steps: usize,
    pub recipe_tags: usize,
    /// Ingredient and tag references that named nothing in the store
    pub skipped_references: usize,
}

impl SeedReport {
    pub fn total_created(&self) -> usize {
        self.categories
            + self.ingredients
            + self.tags
            + self.recipes
            + self.recipe_ingredients
            + self.recipe_steps
            + self.recipe_tags
    }
}

/// Insert every fixture row whose natural key is not yet present.
///
/// Categories, ingredients, tags and recipes are matched by name; existing
/// rows are left untouched. Ingredients, steps and tags are attached only to
/// recipes created by this run, so re-seeding never duplicates child rows.
pub async fn seed_catalog(store: &dyn CatalogStore, fixture: &SeedFixture) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for category in &fixture.categories {
        if store.find_category_by_name(&category.name).await?.is_none() {
            let created = store.insert_category(category.clone()).await?;
            tracing::info!(category = %created.name, "Created category");
            report.categories += 1;
        }
    }

    for ingredient in &fixture.ingredients {
        if store.find_ingredient_by_name(&ingredient.name).await?.is_none() {
            store.insert_ingredient(ingredient.clone()).await?;
            report.ingredients += 1;
        }
    }

    for tag in &fixture.tags {
        if store.find_tag_by_name(&tag.name).await?.is_none() {
            store.insert_tag(tag.clone()).await?;
            report.tags += 1;
        }
    }

    for entry in &fixture.recipes {
        if store.find_recipe_by_name(&entry.name).await?.is_some() {
            tracing::debug!(recipe = %entry.name, "Recipe already present, skipping");
            continue;
        }

        let category = store
            .find_category_by_name(&entry.category)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Recipe '{}' references unknown category '{}'",
                    entry.name, entry.category
                ))
            })?;

        let recipe = store.insert_recipe(entry.to_new_recipe(category.id)).await?;
        tracing::info!(recipe = %recipe.name, slug = %recipe.slug, "Created recipe");
        report.recipes += 1;

        for item in &entry.ingredients {
            match store.find_ingredient_by_name(&item.name).await? {
                Some(ingredient) => {
                    store
                        .add_recipe_ingredient(
                            recipe.id,
                            ingredient.id,
                            item.quantity.clone(),
                            item.notes.clone(),
                        )
                        .await?;
                    report.recipe_ingredients += 1;
                }
                None => {
                    tracing::debug!(recipe = %recipe.name, ingredient = %item.name, "Skipping unknown ingredient");
                    report.skipped_references += 1;
                }
            }
        }

        for (number, step) in (1u32..).zip(&entry.steps) {
            store
                .add_recipe_step(
                    recipe.id,
                    number,
                    step.instruction().to_string(),
                    step.time_minutes(),
                )
                .await?;
            report.recipe_steps += 1;
        }

        for name in &entry.tags {
            match store.find_tag_by_name(name).await? {
                Some(tag) => {
                    store.add_recipe_tag(recipe.id, tag.id).await?;
                    report.recipe_tags += 1;
                }
                None => {
                    tracing::debug!(recipe = %recipe.name, tag = %name, "Skipping unknown tag");
                    report.skipped_references += 1;
                }
            }
        }
    }

    record(&report);
    tracing::info!(
        created = report.total_created(),
        skipped_references = report.skipped_references,
        "Seeding complete"
    );
    Ok(report)
}

fn record(report: &SeedReport) {
    let rows = [
        ("category", report.categories),
        ("ingredient", report.ingredients),
        ("tag", report.tags),
        ("recipe", report.recipes),
        ("recipe_ingredient", report.recipe_ingredients),
        ("recipe_step", report.recipe_steps),
        ("recipe_tag", report.recipe_tags),
    ];
    for (entity, count) in rows {
        SEEDED_ROWS_TOTAL
            .with_label_values(&[entity])
            .inc_by(count as f64);
    }
}
