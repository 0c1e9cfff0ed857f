//! Wire shape of the remote news endpoint.

use crate::model::article::{Article, ArticleId, UNTITLED};
use serde::{Deserialize, Serialize};

/// Top-level listing envelope. Only `articles` is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: Option<String>,
    pub total_results: Option<u64>,
    pub articles: Option<Vec<RemoteArticleRecord>>,
}

/// One remote article. The endpoint gives no stable identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArticleRecord {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
}

impl NewsResponse {
    pub fn from_records(records: Vec<RemoteArticleRecord>) -> Self {
        Self {
            status: Some("ok".to_string()),
            total_results: Some(records.len() as u64),
            articles: Some(records),
        }
    }
}

/// Maps remote records to articles with 1-based positional ids.
pub fn normalize_remote(response: NewsResponse) -> Vec<Article> {
    response
        .articles
        .unwrap_or_default()
        .into_iter()
        .zip(1..)
        .map(|(record, id): (RemoteArticleRecord, ArticleId)| Article {
            id,
            title: record.title.unwrap_or_else(|| UNTITLED.to_string()),
            author: record.author,
            content: record.content,
            image_url: record.image_url,
        })
        .collect()
}
