//! Tagged view state for the article list.

use crate::model::article::Article;

/// What the list view should currently render.
///
/// Snapshots are immutable; transitions replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Loading,
    Success(Vec<Article>),
    Empty,
    Error(String),
}

impl UiState {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Stable lowercase name used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Empty => "empty",
            Self::Error(_) => "error",
        }
    }

    /// Articles carried by a `Success` state.
    pub fn articles(&self) -> Option<&[Article]> {
        match self {
            Self::Success(articles) => Some(articles),
            Self::Loading | Self::Empty | Self::Error(_) => None,
        }
    }
}
