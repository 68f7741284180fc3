//! Sorting for recipe listings driven by the `ordering` query parameter

use crate::models::Recipe;
use std::cmp::Ordering;
use std::str::FromStr;
use strum::{Display, EnumString};

/// Fields a recipe listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum OrderField {
    CreatedAt,
    TotalTime,
    CaloriesPerServing,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: OrderField,
    pub descending: bool,
}

impl SortKey {
    fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        let ordering = match self.field {
            OrderField::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderField::TotalTime => a.total_time.cmp(&b.total_time),
            OrderField::CaloriesPerServing => a.calories_per_serving.cmp(&b.calories_per_serving),
            OrderField::Name => a.name.cmp(&b.name),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Ordering requested through the `ordering` query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeOrdering {
    keys: Vec<SortKey>,
}

impl Default for RecipeOrdering {
    /// Most recently created first
    fn default() -> Self {
        Self {
            keys: vec![SortKey {
                field: OrderField::CreatedAt,
                descending: true,
            }],
        }
    }
}

impl RecipeOrdering {
    /// Parse a comma-separated list such as `-total_time,name`. Unknown
    /// fields are dropped; when nothing valid remains the default applies.
    pub fn parse(value: Option<&str>) -> Self {
        let keys: Vec<SortKey> = value
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter_map(|part| {
                let (descending, name) = match part.strip_prefix('-') {
                    Some(name) => (true, name),
                    None => (false, part),
                };
                OrderField::from_str(name)
                    .ok()
                    .map(|field| SortKey { field, descending })
            })
            .collect();

        if keys.is_empty() {
            Self::default()
        } else {
            Self { keys }
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Stable sort; recipes equal on every key keep their incoming order
    pub fn apply(&self, recipes: &mut [Recipe]) {
        recipes.sort_by(|a, b| {
            self.keys
                .iter()
                .fold(Ordering::Equal, |acc, key| acc.then_with(|| key.compare(a, b)))
        });
    }
}
