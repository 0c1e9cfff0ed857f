//! Article synchronization: refresh reconciliation and the live cache stream.
//!
//! # Responsibility
//! - Define the `ArticleFeed` contract consumed by the presentation layer.
//! - Reconcile the local cache with the remote source or the fixture.
//!
//! # Invariants
//! - The synchronizer is the only writer of the article cache.
//! - Only remote failures and storage failures surface as `SyncError`.

pub mod synchronizer;

pub use synchronizer::ArticleSynchronizer;

use crate::model::article::{Article, ArticleId};
use crate::remote::RemoteError;
use crate::repo::article_repo::RepoError;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Live view of the cache, newest id first.
///
/// A fresh receiver yields the current contents via `borrow`, then wakes on
/// every committed write. Intermediate snapshots may be skipped when writes
/// land faster than the receiver polls.
pub type ArticleStream = watch::Receiver<Vec<Article>>;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Article source the presentation layer drives.
#[async_trait]
pub trait ArticleFeed: Send + Sync {
    fn observe_articles(&self) -> ArticleStream;

    /// Reconciles the cache with the remote listing.
    async fn refresh(&self) -> SyncResult<()>;

    /// Point lookup; a missing id is `Ok(None)`.
    async fn get_article(&self, id: ArticleId) -> SyncResult<Option<Article>>;

    /// Overwrites the cached article with the same id.
    async fn update_article(&self, article: Article) -> SyncResult<()>;
}
