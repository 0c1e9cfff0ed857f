//! List view state machine over an [`ArticleFeed`].
//!
//! # Responsibility
//! - Derive one observable [`UiState`] from the cache stream and the outcome
//!   of explicit refresh requests.
//! - Pass detail reads and edits through to the feed.
//!
//! # Invariants
//! - The view model is the only writer of its state; every transition is an
//!   atomic compare-and-modify on the state channel.
//! - An empty cache before the first successful load never reports `Empty`.
//! - A refresh failure never replaces displayed `Success` data.
//! - After `close()` returns, no further state is published.
//!
//! The two update sources are not ordered against each other; each one's
//! last write wins.

use crate::model::article::{Article, ArticleId};
use crate::model::ui_state::UiState;
use crate::sync::{ArticleFeed, ArticleStream, SyncResult};
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Lifecycle-scoped presenter for the article list.
pub struct NewsViewModel {
    feed: Arc<dyn ArticleFeed>,
    state_tx: Arc<watch::Sender<UiState>>,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl NewsViewModel {
    /// Creates the view model in `Loading` and subscribes to the cache.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime.
    pub fn new(feed: Arc<dyn ArticleFeed>) -> Self {
        let (state_tx, _) = watch::channel(UiState::Loading);
        let view_model = Self {
            feed,
            state_tx: Arc::new(state_tx),
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        };

        view_model.tasks.spawn(observe_cache(
            view_model.feed.observe_articles(),
            Arc::clone(&view_model.state_tx),
            view_model.cancel.clone(),
        ));
        view_model
    }

    /// Creates the view model and immediately starts a refresh.
    pub fn launch(feed: Arc<dyn ArticleFeed>) -> Self {
        let view_model = Self::new(feed);
        view_model.refresh();
        view_model
    }

    /// Current state snapshot.
    pub fn state(&self) -> UiState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state_tx.subscribe()
    }

    /// Sets `Loading` before returning, then refreshes the feed in a tracked
    /// task.
    ///
    /// Overlapping calls are not de-duplicated. The returned handle resolves
    /// once this refresh has applied its outcome (or was cancelled).
    pub fn refresh(&self) -> JoinHandle<()> {
        let mut displayed = None;
        transition(&self.state_tx, &self.cancel, "refresh_start", |current| {
            displayed = current.articles().map(<[Article]>::to_vec);
            Some(UiState::Loading)
        });

        let feed = Arc::clone(&self.feed);
        let state_tx = Arc::clone(&self.state_tx);
        let cancel = self.cancel.clone();

        self.tasks.spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                outcome = feed.refresh() => outcome,
            };

            if let Err(err) = outcome {
                let message = error_message(&err.to_string());
                warn!("event=ui_refresh module=presentation status=error error={message}");
                transition(&state_tx, &cancel, "refresh_failure", |current| {
                    on_refresh_failure(current, displayed, message)
                });
            }
        })
    }

    pub async fn get_article(&self, id: ArticleId) -> SyncResult<Option<Article>> {
        self.feed.get_article(id).await
    }

    /// Persists an edit; the cache stream carries it back into `Success`.
    pub async fn update_article(&self, article: Article) -> SyncResult<()> {
        self.feed.update_article(article).await
    }

    /// Cancels the cache subscription and in-flight refreshes.
    pub fn close(&self) {
        self.cancel.cancel();
        self.tasks.close();
        // Take the state lock once so a transition already past its
        // cancellation check finishes before this returns.
        self.state_tx.send_if_modified(|_| false);
    }

    /// Closes and waits for every tracked task to finish.
    pub async fn shutdown(&self) {
        self.close();
        self.tasks.wait().await;
    }
}

impl Drop for NewsViewModel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn observe_cache(
    mut articles: ArticleStream,
    state_tx: Arc<watch::Sender<UiState>>,
    cancel: CancellationToken,
) {
    loop {
        let snapshot = articles.borrow_and_update().clone();
        transition(&state_tx, &cancel, "cache", |current| {
            on_cache_emission(current, snapshot)
        });

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = articles.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

/// Applies `next` to the current state unless the view model is closed.
fn transition(
    state_tx: &watch::Sender<UiState>,
    cancel: &CancellationToken,
    source: &'static str,
    next: impl FnOnce(&UiState) -> Option<UiState>,
) {
    state_tx.send_if_modified(|current| {
        if cancel.is_cancelled() {
            return false;
        }
        match next(current) {
            Some(state) if state != *current => {
                debug!(
                    "event=ui_state module=presentation status=ok source={source} from={} to={}",
                    current.kind(),
                    state.kind()
                );
                *current = state;
                true
            }
            _ => false,
        }
    });
}

/// Reducer for one cache emission.
pub(crate) fn on_cache_emission(current: &UiState, articles: Vec<Article>) -> Option<UiState> {
    if !articles.is_empty() {
        return Some(UiState::Success(articles));
    }
    match current {
        UiState::Success(_) => Some(UiState::Empty),
        UiState::Loading | UiState::Empty | UiState::Error(_) => None,
    }
}

/// Reducer for a failed refresh.
///
/// `displayed` holds the `Success` articles on screen when the refresh
/// started; they are restored if nothing newer arrived in the meantime.
pub(crate) fn on_refresh_failure(
    current: &UiState,
    displayed: Option<Vec<Article>>,
    message: String,
) -> Option<UiState> {
    match (current, displayed) {
        (UiState::Success(_), _) => None,
        (UiState::Loading, Some(articles)) => Some(UiState::Success(articles)),
        _ => Some(UiState::Error(message)),
    }
}

fn error_message(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}
