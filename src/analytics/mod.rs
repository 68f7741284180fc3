//! Catalog statistics
//!
//! Aggregates run over the entire recipe set; list filters never apply.
//! Averages and the vegetarian percentage round half to even and fall back
//! to 0 on an empty catalog.

mod aggregation;
mod statistics;

pub use aggregation::{compute_stats, recipe_counts_by_category, CatalogStats, CategoryCount};
pub use statistics::{mean, percentage, round_half_even, rounded_mean};
