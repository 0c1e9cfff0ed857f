//! Article domain model.
//!
//! # Responsibility
//! - Define the canonical cached record rendered by list and detail views.
//!
//! # Invariants
//! - `id` is unique among cached articles; it is only stable inside the local
//!   cache because remote records carry no identity.
//! - `title` is always present; missing source titles become `"Untitled"`.

use serde::{Deserialize, Serialize};

/// Cache-local article identifier.
pub type ArticleId = i64;

/// Title stored when the source record omits one.
pub const UNTITLED: &str = "Untitled";

/// Canonical cached article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub author: Option<String>,
    /// User-editable body text.
    pub content: Option<String>,
    pub image_url: Option<String>,
}

impl Article {
    /// Creates an article with only the required fields set.
    pub fn new(id: ArticleId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
            content: None,
            image_url: None,
        }
    }

    /// Returns a copy with the body replaced, as produced by the detail editor.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..self.clone()
        }
    }
}
