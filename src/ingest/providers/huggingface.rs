// src/ingest/providers/huggingface.rs
use anyhow::Result;
use async_trait::async_trait;

use super::{record_parse, Mode};
use crate::ingest::types::{FetchError, RawItem, SourceProvider};
use crate::origin::Origin;

/// Hugging Face model listing (`/api/models`), a bare JSON array.
pub struct HuggingFaceProvider {
    mode: Mode,
}

impl HuggingFaceProvider {
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
        let items: Vec<RawItem> =
            serde_json::from_str(s).map_err(|e| FetchError::parse(Origin::Model, e))?;
        record_parse(t0, Origin::Model);
        Ok(items)
    }
}

#[async_trait]
impl SourceProvider for HuggingFaceProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        let body = self.mode.body(self.name()).await?;
        Self::parse_items_from_str(&body)
    }

    fn origin(&self) -> Origin {
        Origin::Model
    }

    fn name(&self) -> &'static str {
        "HuggingFace"
    }
}
