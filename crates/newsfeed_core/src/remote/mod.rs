//! Remote news sources and the raw records they return.
//!
//! # Responsibility
//! - Define the `NewsSource` seam the synchronizer fetches through.
//! - Normalize remote records and the embedded fixture into `Article`s.

pub mod fixture;
pub mod http;
pub mod record;

pub use fixture::{fixture_articles, parse_fixture, FixtureArticleRecord, FIXTURE_JSON};
pub use http::HttpNewsSource;
pub use record::{normalize_remote, NewsResponse, RemoteArticleRecord};

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failure while fetching remote articles.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid news endpoint `{0}`")]
    InvalidEndpoint(String),
    #[error("news request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("news source unavailable: {0}")]
    Unavailable(String),
}

/// Source of remote article listings.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_articles(&self) -> Result<NewsResponse, RemoteError>;
}
