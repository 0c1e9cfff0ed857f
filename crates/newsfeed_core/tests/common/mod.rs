//! Shared fakes for integration suites.
#![allow(dead_code)]

use async_trait::async_trait;
use newsfeed_core::db::open_db_in_memory;
use newsfeed_core::{
    Article, ArticleFeed, ArticleId, ArticleStream, ArticleSynchronizer, NewsResponse,
    NewsSource, RemoteArticleRecord, RemoteError, RepoError, SqliteArticleRepository, SyncError,
    SyncResult, UiState,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

pub fn remote(title: Option<&str>, author: Option<&str>) -> RemoteArticleRecord {
    RemoteArticleRecord {
        title: title.map(str::to_string),
        author: author.map(str::to_string),
        content: Some(format!("body of {}", title.unwrap_or("untitled"))),
        image_url: None,
    }
}

enum Reply {
    Articles(Vec<RemoteArticleRecord>),
    Fail(String),
}

struct Step {
    reply: Reply,
    delay: Duration,
}

/// Scripted news source. Queued steps are consumed in call order; once the
/// queue is empty the fallback reply is repeated.
#[derive(Clone)]
pub struct FakeNewsSource {
    queue: Arc<Mutex<VecDeque<Step>>>,
    fallback: Arc<Mutex<Option<String>>>,
    fallback_articles: Arc<Mutex<Vec<RemoteArticleRecord>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeNewsSource {
    pub fn returning(records: Vec<RemoteArticleRecord>) -> Self {
        Self {
            queue: Arc::default(),
            fallback: Arc::default(),
            fallback_articles: Arc::new(Mutex::new(records)),
            calls: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        let source = Self::returning(Vec::new());
        source.set_failure(Some(message));
        source
    }

    pub fn set_articles(&self, records: Vec<RemoteArticleRecord>) {
        *self.fallback_articles.lock().unwrap() = records;
        self.set_failure(None);
    }

    pub fn set_failure(&self, message: Option<&str>) {
        *self.fallback.lock().unwrap() = message.map(str::to_string);
    }

    pub fn push_articles(&self, records: Vec<RemoteArticleRecord>, delay: Duration) {
        self.queue.lock().unwrap().push_back(Step {
            reply: Reply::Articles(records),
            delay,
        });
    }

    pub fn push_failure(&self, message: &str, delay: Duration) {
        self.queue.lock().unwrap().push_back(Step {
            reply: Reply::Fail(message.to_string()),
            delay,
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fallback_reply(&self) -> Reply {
        if let Some(message) = self.fallback.lock().unwrap().clone() {
            return Reply::Fail(message);
        }
        Reply::Articles(self.fallback_articles.lock().unwrap().clone())
    }
}

#[async_trait]
impl NewsSource for FakeNewsSource {
    async fn fetch_articles(&self) -> Result<NewsResponse, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.queue.lock().unwrap().pop_front();
        let reply = match step {
            Some(step) => {
                if !step.delay.is_zero() {
                    tokio::time::sleep(step.delay).await;
                }
                step.reply
            }
            None => self.fallback_reply(),
        };

        match reply {
            Reply::Articles(records) => Ok(NewsResponse::from_records(records)),
            Reply::Fail(message) => Err(RemoteError::Unavailable(message)),
        }
    }
}

pub type TestSynchronizer = ArticleSynchronizer<SqliteArticleRepository, FakeNewsSource>;

pub fn memory_synchronizer(source: FakeNewsSource) -> TestSynchronizer {
    let conn = open_db_in_memory().unwrap();
    ArticleSynchronizer::new(SqliteArticleRepository::new(conn), source).unwrap()
}

pub fn memory_synchronizer_with_fixture(
    source: FakeNewsSource,
    fixture: &'static str,
) -> TestSynchronizer {
    let conn = open_db_in_memory().unwrap();
    ArticleSynchronizer::with_fixture(SqliteArticleRepository::new(conn), source, fixture)
        .unwrap()
}

/// Feed whose cache stream is driven directly by the test.
pub struct ScriptedFeed {
    articles_tx: watch::Sender<Vec<Article>>,
    fail_refresh: AtomicBool,
}

impl ScriptedFeed {
    pub fn new(initial: Vec<Article>) -> Arc<Self> {
        let (articles_tx, _) = watch::channel(initial);
        Arc::new(Self {
            articles_tx,
            fail_refresh: AtomicBool::new(false),
        })
    }

    pub fn emit(&self, articles: Vec<Article>) {
        self.articles_tx.send_replace(articles);
    }

    pub fn set_fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArticleFeed for ScriptedFeed {
    fn observe_articles(&self) -> ArticleStream {
        self.articles_tx.subscribe()
    }

    async fn refresh(&self) -> SyncResult<()> {
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("Fake error".to_string()).into());
        }
        self.emit(vec![Article::new(1, "Test Title")]);
        Ok(())
    }

    async fn get_article(&self, id: ArticleId) -> SyncResult<Option<Article>> {
        Ok(self
            .articles_tx
            .borrow()
            .iter()
            .find(|article| article.id == id)
            .cloned())
    }

    async fn update_article(&self, article: Article) -> SyncResult<()> {
        let mut found = false;
        self.articles_tx.send_modify(|articles| {
            if let Some(slot) = articles.iter_mut().find(|slot| slot.id == article.id) {
                *slot = article.clone();
                found = true;
            }
        });
        if found {
            Ok(())
        } else {
            Err(SyncError::Repo(RepoError::NotFound(article.id)))
        }
    }
}

/// Waits until the view state satisfies `predicate`, failing after
/// [`WAIT_LIMIT`].
pub async fn wait_for_state(
    rx: &mut watch::Receiver<UiState>,
    predicate: impl FnMut(&UiState) -> bool,
) -> UiState {
    tokio::time::timeout(WAIT_LIMIT, rx.wait_for(predicate))
        .await
        .expect("state did not settle in time")
        .expect("state channel closed")
        .clone()
}

pub fn titles(articles: &[Article]) -> Vec<(ArticleId, &str)> {
    articles
        .iter()
        .map(|article| (article.id, article.title.as_str()))
        .collect()
}
