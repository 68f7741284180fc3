use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// A free-form label attached to recipes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    /// Hex color code, e.g. `#10b981`
    pub color: String,
}

impl Tag {
    pub fn from_new(id: u64, new: NewTag) -> Self {
        Self {
            id,
            name: new.name,
            color: new.color,
        }
    }
}

/// Insert payload for a tag
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTag {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[serde(default = "default_tag_color")]
    pub color: String,
}

impl NewTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: default_tag_color(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn has_valid_color(&self) -> bool {
        HEX_COLOR.is_match(&self.color)
    }
}

fn default_tag_color() -> String {
    "#10b981".to_string()
}

/// Link row between a recipe and a tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeTag {
    pub id: u64,
    pub recipe_id: u64,
    pub tag_id: u64,
}
