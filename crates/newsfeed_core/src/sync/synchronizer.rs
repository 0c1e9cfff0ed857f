//! Repository-backed article synchronizer.
//!
//! # Invariants
//! - A failed fetch leaves the cache untouched.
//! - An empty remote listing is replaced by the fixture. Only a fixture
//!   that fails to parse leaves the cache written empty.
//! - Cache writes are serialized; each write is followed by a snapshot
//!   publish under the same lock, so stream order matches commit order.
//! - Overlapping refreshes are not coalesced; the last commit wins.

use crate::model::article::{Article, ArticleId};
use crate::remote::{normalize_remote, parse_fixture, NewsSource, FIXTURE_JSON};
use crate::repo::article_repo::{ArticleRepository, RepoResult};
use crate::sync::{ArticleFeed, ArticleStream, SyncResult};
use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::watch;

/// Owns the cache write path and its change stream.
pub struct ArticleSynchronizer<R, N> {
    repo: Arc<R>,
    source: N,
    fixture: &'static str,
    articles_tx: Arc<watch::Sender<Vec<Article>>>,
    write_lock: Arc<Mutex<()>>,
}

impl<R, N> ArticleSynchronizer<R, N>
where
    R: ArticleRepository + 'static,
    N: NewsSource,
{
    /// Creates a synchronizer seeded with the current cache contents.
    pub fn new(repo: R, source: N) -> RepoResult<Self> {
        Self::with_fixture(repo, source, FIXTURE_JSON)
    }

    /// Like [`Self::new`], with `fixture` as the fallback document.
    ///
    /// A fixture that fails to parse falls back to an empty listing.
    pub fn with_fixture(repo: R, source: N, fixture: &'static str) -> RepoResult<Self> {
        let initial = repo.list_articles()?;
        let (articles_tx, _) = watch::channel(initial);

        Ok(Self {
            repo: Arc::new(repo),
            source,
            fixture,
            articles_tx: Arc::new(articles_tx),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn observe_articles(&self) -> ArticleStream {
        self.articles_tx.subscribe()
    }

    /// Fetches, normalizes and atomically replaces the cache.
    ///
    /// # Errors
    /// - `SyncError::Remote` when the fetch fails; the cache is unchanged.
    /// - `SyncError::Repo` when the replace transaction fails.
    pub async fn refresh(&self) -> SyncResult<()> {
        let started_at = Instant::now();
        info!("event=articles_refresh module=sync status=start");

        let response = match self.source.fetch_articles().await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=articles_refresh module=sync status=error duration_ms={} error_code=fetch_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let mut articles = normalize_remote(response);
        let origin = if articles.is_empty() {
            articles = parse_fixture(self.fixture);
            info!(
                "event=articles_fallback module=sync status=ok count={}",
                articles.len()
            );
            "fixture"
        } else {
            "remote"
        };

        match self
            .write_and_publish(move |repo| repo.replace_all(&articles))
            .await
        {
            Ok(count) => {
                info!(
                    "event=articles_refresh module=sync status=ok origin={origin} count={count} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=articles_refresh module=sync status=error duration_ms={} error_code=cache_write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    pub async fn get_article(&self, id: ArticleId) -> SyncResult<Option<Article>> {
        let repo = Arc::clone(&self.repo);
        Ok(tokio::task::spawn_blocking(move || repo.get_article(id)).await??)
    }

    /// Overwrites the cached row with `article.id`.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no row has that id; nothing is published.
    pub async fn update_article(&self, article: Article) -> SyncResult<()> {
        let id = article.id;
        match self
            .write_and_publish(move |repo| repo.update_article(&article))
            .await
        {
            Ok(_) => {
                info!("event=article_update module=sync status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                warn!("event=article_update module=sync status=error id={id} error={err}");
                Err(err)
            }
        }
    }

    /// Runs one write on the blocking pool and publishes the resulting
    /// snapshot. Returns the published article count.
    async fn write_and_publish<F>(&self, write: F) -> SyncResult<usize>
    where
        F: FnOnce(&R) -> RepoResult<()> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        let articles_tx = Arc::clone(&self.articles_tx);
        let write_lock = Arc::clone(&self.write_lock);

        tokio::task::spawn_blocking(move || -> SyncResult<usize> {
            let _guard = write_lock.lock().unwrap_or_else(PoisonError::into_inner);
            write(repo.as_ref())?;
            let snapshot = repo.list_articles()?;
            let count = snapshot.len();
            articles_tx.send_replace(snapshot);
            Ok(count)
        })
        .await?
    }
}

#[async_trait]
impl<R, N> ArticleFeed for ArticleSynchronizer<R, N>
where
    R: ArticleRepository + 'static,
    N: NewsSource,
{
    fn observe_articles(&self) -> ArticleStream {
        ArticleSynchronizer::observe_articles(self)
    }

    async fn refresh(&self) -> SyncResult<()> {
        ArticleSynchronizer::refresh(self).await
    }

    async fn get_article(&self, id: ArticleId) -> SyncResult<Option<Article>> {
        ArticleSynchronizer::get_article(self, id).await
    }

    async fn update_article(&self, article: Article) -> SyncResult<()> {
        ArticleSynchronizer::update_article(self, article).await
    }
}
