//! Core logic for the newsfeed reader.
//!
//! The synchronizer reconciles a local SQLite article cache with a remote news
//! listing (falling back to an embedded fixture), and the view model derives
//! the list view state from that cache.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod remote;
pub mod repo;
pub mod sync;

pub use config::{ConfigError, NewsConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{Article, ArticleId, UNTITLED};
pub use model::ui_state::UiState;
pub use presentation::NewsViewModel;
pub use remote::{
    HttpNewsSource, NewsResponse, NewsSource, RemoteArticleRecord, RemoteError,
};
pub use repo::article_repo::{ArticleRepository, RepoError, RepoResult, SqliteArticleRepository};
pub use sync::{ArticleFeed, ArticleStream, ArticleSynchronizer, SyncError, SyncResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
