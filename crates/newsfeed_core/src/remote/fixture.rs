//! Embedded fallback dataset used when the remote listing is empty.
//!
//! The fixture deliberately uses a different field naming
//! (`identifier/heading/writer`) than the canonical article.
//!
//! # Invariants
//! - Parsing never fails the caller; malformed input yields an empty list.

use crate::model::article::Article;
use log::warn;
use serde::Deserialize;

/// Hardcoded fallback listing.
pub const FIXTURE_JSON: &str = r#"[
  {"identifier":1,"heading":"Hello","writer":"Alice"},
  {"identifier":2,"heading":"Compose + Room","writer":"Bob"}
]"#;

/// Raw fixture record before field remapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureArticleRecord {
    pub identifier: i64,
    pub heading: String,
    pub writer: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

impl From<FixtureArticleRecord> for Article {
    fn from(record: FixtureArticleRecord) -> Self {
        Self {
            id: record.identifier,
            title: record.heading,
            author: record.writer,
            content: record.content,
            image_url: record.image_url,
        }
    }
}

/// Parses a fixture document into articles, degrading to empty on error.
pub fn parse_fixture(json: &str) -> Vec<Article> {
    match serde_json::from_str::<Vec<FixtureArticleRecord>>(json) {
        Ok(records) => records.into_iter().map(Article::from).collect(),
        Err(err) => {
            warn!("event=fixture_parse module=remote status=error error={err}");
            Vec::new()
        }
    }
}

/// Parses the embedded [`FIXTURE_JSON`].
pub fn fixture_articles() -> Vec<Article> {
    parse_fixture(FIXTURE_JSON)
}

#[cfg(test)]
mod tests {
    use super::{fixture_articles, parse_fixture};

    #[test]
    fn embedded_fixture_maps_renamed_fields() {
        let articles = fixture_articles();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, 1);
        assert_eq!(articles[0].title, "Hello");
        assert_eq!(articles[0].author.as_deref(), Some("Alice"));
        assert_eq!(articles[1].id, 2);
        assert_eq!(articles[1].title, "Compose + Room");
        assert_eq!(articles[1].author.as_deref(), Some("Bob"));
        assert!(articles.iter().all(|article| article.content.is_none()));
    }

    #[test]
    fn optional_fields_pass_through() {
        let articles = parse_fixture(
            r#"[{"identifier":9,"heading":"H","writer":null,"content":"c","imageUrl":"i.png"}]"#,
        );

        assert_eq!(articles[0].author, None);
        assert_eq!(articles[0].content.as_deref(), Some("c"));
        assert_eq!(articles[0].image_url.as_deref(), Some("i.png"));
    }

    #[test]
    fn malformed_fixture_degrades_to_empty() {
        assert!(parse_fixture("{not json").is_empty());
        assert!(parse_fixture(r#"[{"heading":"missing identifier"}]"#).is_empty());
        assert!(parse_fixture(r#"{"identifier":1,"heading":"not an array"}"#).is_empty());
    }
}
