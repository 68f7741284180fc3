use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Shared ingredient reference data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: u64,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn from_new(id: u64, new: NewIngredient, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            emoji: new.emoji,
            description: new.description,
            created_at: now,
        }
    }
}

/// Insert payload for an ingredient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewIngredient {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default = "default_ingredient_emoji")]
    #[validate(length(max = 10))]
    pub emoji: String,

    #[serde(default)]
    pub description: String,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: default_ingredient_emoji(),
            description: String::new(),
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }
}

fn default_ingredient_emoji() -> String {
    "🥗".to_string()
}
