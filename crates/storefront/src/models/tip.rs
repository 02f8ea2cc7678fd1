//! Travel tips shown on the tips page.

use serde::{Deserialize, Serialize};

/// A travel tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipRecord {
    pub title: String,
    pub description: String,
    /// Page with the full article, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TipRecord {
    /// A tip without a linked article.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: None,
        }
    }
}
