// src/ingest/providers/hackernews.rs
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::{record_parse, Mode};
use crate::ingest::types::{FetchError, RawItem, SourceProvider};
use crate::origin::Origin;

/// Algolia search page: `{ "hits": [ {...}, ... ], ... }`.
#[derive(Debug, Deserialize)]
struct SearchPage {
    hits: Vec<RawItem>,
}

/// Hacker News front page via the Algolia search API.
pub struct HackerNewsProvider {
    mode: Mode,
}

impl HackerNewsProvider {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client,
            },
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<RawItem>> {
        let t0 = std::time::Instant::now();
        let page: SearchPage =
            serde_json::from_str(s).map_err(|e| FetchError::parse(Origin::News, e))?;
        record_parse(t0, Origin::News);
        Ok(page.hits)
    }
}

#[async_trait]
impl SourceProvider for HackerNewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        let body = self.mode.body(self.name()).await?;
        Self::parse_items_from_str(&body)
    }

    fn origin(&self) -> Origin {
        Origin::News
    }

    fn name(&self) -> &'static str {
        "HackerNews"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_hits_is_a_parse_error() {
        let err = HackerNewsProvider::parse_items_from_str(r#"{"nbHits": 0}"#).unwrap_err();
        assert!(err.to_string().contains("unexpected news response"));
    }

    #[test]
    fn empty_hits_is_fine() {
        let items = HackerNewsProvider::parse_items_from_str(r#"{"hits": []}"#).unwrap();
        assert!(items.is_empty());
    }
}
