//! Idempotent catalog seeding from TOML fixtures

mod fixture;
mod loader;

pub use fixture::{FixtureIngredient, FixtureRecipe, FixtureStep, SeedFixture};
pub use loader::{seed_catalog, SeedReport};
