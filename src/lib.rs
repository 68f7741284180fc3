//! Recipe catalog service
//!
//! Serves a read-only catalog of recipes over HTTP: filtered and ordered
//! listings, recipe detail, categories, ingredients, catalog statistics and
//! featured recipes. Data lives in a [`state::CatalogStore`] (in-memory or
//! sled) and is populated by idempotent [`seed`] fixtures.

pub mod analytics;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod query;
pub mod seed;
pub mod state;

pub use error::{AppError, Result};
