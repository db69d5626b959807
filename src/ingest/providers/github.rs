// src/ingest/providers/github.rs
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::{record_parse, Mode};
use crate::ingest::types::{FetchError, RawItem, SourceProvider};
use crate::origin::Origin;

#[derive(Debug, Deserialize)]
struct SearchPage {
    items: Vec<RawItem>,
}

/// GitHub repository search (`/search/repositories`).
pub struct GithubProvider {
    mode: Mode,
}

impl GithubProvider {
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
            serde_json::from_str(s).map_err(|e| FetchError::parse(Origin::Repository, e))?;
        record_parse(t0, Origin::Repository);
        Ok(page.items)
    }
}

#[async_trait]
impl SourceProvider for GithubProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        let body = self.mode.body(self.name()).await?;
        Self::parse_items_from_str(&body)
    }

    fn origin(&self) -> Origin {
        Origin::Repository
    }

    fn name(&self) -> &'static str {
        "GitHub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_body_is_rejected() {
        // GitHub answers rate-limited calls with a message object, no items.
        let body = r#"{"message": "API rate limit exceeded"}"#;
        assert!(GithubProvider::parse_items_from_str(body).is_err());
    }
}
