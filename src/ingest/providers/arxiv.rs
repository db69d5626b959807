// src/ingest/providers/arxiv.rs
use anyhow::Result;
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{record_parse, Mode};
use crate::ingest::types::{FetchError, RawItem, SourceProvider};
use crate::origin::Origin;

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    #[serde(rename = "author", default)]
    author: Vec<Author>,
    #[serde(rename = "category", default)]
    category: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(rename = "@term")]
    term: Option<String>,
}

impl Entry {
    /// Flatten an Atom entry into the raw record shape the normalizer reads.
    /// `title`, `link`, `summary` and `published` are always present (possibly empty).
    fn into_raw(self) -> RawItem {
        let mut raw = RawItem::new();
        raw.insert("title".into(), json!(self.title.unwrap_or_default()));
        raw.insert("link".into(), json!(self.id.unwrap_or_default()));
        raw.insert("summary".into(), json!(self.summary.unwrap_or_default()));
        raw.insert("published".into(), json!(self.published.unwrap_or_default()));
        if let Some(u) = self.updated {
            raw.insert("updated".into(), json!(u));
        }

        let authors: Vec<Value> = self
            .author
            .into_iter()
            .filter_map(|a| a.name)
            .map(|n| json!(n.trim()))
            .collect();
        if !authors.is_empty() {
            raw.insert("authors".into(), Value::Array(authors));
        }

        let categories: Vec<Value> = self
            .category
            .into_iter()
            .filter_map(|c| c.term)
            .map(Value::String)
            .collect();
        if !categories.is_empty() {
            raw.insert("categories".into(), Value::Array(categories));
        }
        raw
    }
}

/// arXiv query API. The response is an Atom document; each `<entry>` becomes one item.
pub struct ArxivProvider {
    mode: Mode,
}

impl ArxivProvider {
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
        let feed: Feed = from_str(s).map_err(|e| FetchError::parse(Origin::Preprint, e))?;
        let out: Vec<RawItem> = feed.entry.into_iter().map(Entry::into_raw).collect();
        record_parse(t0, Origin::Preprint);
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for ArxivProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        let body = self.mode.body(self.name()).await?;
        Self::parse_items_from_str(&body)
    }

    fn origin(&self) -> Origin {
        Origin::Preprint
    }

    fn name(&self) -> &'static str {
        "arXiv"
    }
}
