use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A recipe category such as "Salads" or "Soups"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: u64,

    /// Unique display name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Emoji shown next to the name
    pub emoji: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn from_new(id: u64, new: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            emoji: new.emoji,
            created_at: now,
        }
    }
}

/// Insert payload for a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_category_emoji")]
    #[validate(length(max = 10))]
    pub emoji: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            emoji: default_category_emoji(),
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

fn default_category_emoji() -> String {
    "🍽️".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_defaults() {
        let new = NewCategory::new("Soups");
        assert_eq!(new.emoji, "🍽️");
        assert!(new.description.is_empty());
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(NewCategory::new("").validate().is_err());
    }
}
