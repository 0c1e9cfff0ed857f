//! Article repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the table operations the synchronizer needs over `articles`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `replace_all` clears and refills the table in one immediate transaction,
//!   so a reader sees either the previous set or the new one. Rows sharing an
//!   id within one batch resolve to the last one.
//! - List reads are ordered by `id DESC`.
//! - `update_article` never inserts; a missing id is `RepoError::NotFound`.

use crate::db::DbError;
use crate::model::article::{Article, ArticleId};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    content,
    image_url
FROM articles";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for article persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("article not found: {0}")]
    NotFound(ArticleId),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Table operations over the local article cache.
///
/// Implementations are synchronous; async callers run them on the blocking
/// pool.
pub trait ArticleRepository: Send + Sync {
    /// Returns every cached article, newest id first.
    fn list_articles(&self) -> RepoResult<Vec<Article>>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    /// Replaces the whole table contents in one transaction.
    fn replace_all(&self, articles: &[Article]) -> RepoResult<()>;
    /// Overwrites the row matching `article.id`.
    fn update_article(&self, article: &Article) -> RepoResult<()>;
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed article repository owning its connection.
pub struct SqliteArticleRepository {
    conn: Mutex<Connection>,
}

impl SqliteArticleRepository {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // Statements never leave the connection half-written, so a poisoned
        // lock still guards a consistent database.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArticleRepository for SqliteArticleRepository {
    fn list_articles(&self) -> RepoResult<Vec<Article>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{ARTICLE_SELECT_SQL} ORDER BY id DESC;"))?;
        let articles = stmt
            .query_map([], parse_article_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(articles)
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{ARTICLE_SELECT_SQL} WHERE id = ?1 LIMIT 1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_article_row(row)?));
        }

        Ok(None)
    }

    fn replace_all(&self, articles: &[Article]) -> RepoResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM articles;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO articles (
                    id,
                    title,
                    author,
                    content,
                    image_url
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for article in articles {
                insert.execute(params![
                    article.id,
                    article.title.as_str(),
                    article.author.as_deref(),
                    article.content.as_deref(),
                    article.image_url.as_deref(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn update_article(&self, article: &Article) -> RepoResult<()> {
        let changed = self.conn().execute(
            "UPDATE articles
             SET
                title = ?1,
                author = ?2,
                content = ?3,
                image_url = ?4
             WHERE id = ?5;",
            params![
                article.title.as_str(),
                article.author.as_deref(),
                article.content.as_deref(),
                article.image_url.as_deref(),
                article.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(article.id));
        }

        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn().execute("DELETE FROM articles;", [])?;
        Ok(())
    }
}

fn parse_article_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        content: row.get("content")?,
        image_url: row.get("image_url")?,
    })
}
