//! Document categories.

use serde::{Deserialize, Serialize};

/// A user-managed document category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCategory {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
}

/// Write payload for creating or renaming a category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
}

impl CategoryInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
