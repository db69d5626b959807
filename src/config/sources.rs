// src/config/sources.rs
use serde::{Deserialize, Serialize};

use crate::origin::Origin;

pub const DEFAULT_NEWS_URL: &str =
    "https://hn.algolia.com/api/v1/search?tags=front_page&hitsPerPage=100";
pub const DEFAULT_PREPRINT_URL: &str = "https://export.arxiv.org/api/query?search_query=all:physics&sortBy=lastUpdatedDate&sortOrder=descending&max_results=100";
pub const DEFAULT_REPOSITORY_URL: &str =
    "https://api.github.com/search/repositories?q=stars:>1&sort=stars&order=desc&per_page=100";
pub const DEFAULT_MODEL_URL: &str =
    "https://huggingface.co/api/models?sort=downloads&direction=-1&limit=100";

/// Endpoint settings for one origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            enabled: true,
        }
    }
}

/// `[sources.*]` table. Omitted origins keep their default endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourcesConfig {
    #[serde(default = "default_news")]
    pub news: SourceConfig,
    #[serde(default = "default_preprint")]
    pub preprint: SourceConfig,
    #[serde(default = "default_repository")]
    pub repository: SourceConfig,
    #[serde(default = "default_model")]
    pub model: SourceConfig,
}

fn default_news() -> SourceConfig {
    SourceConfig::new(DEFAULT_NEWS_URL)
}
fn default_preprint() -> SourceConfig {
    SourceConfig::new(DEFAULT_PREPRINT_URL)
}
fn default_repository() -> SourceConfig {
    SourceConfig::new(DEFAULT_REPOSITORY_URL)
}
fn default_model() -> SourceConfig {
    SourceConfig::new(DEFAULT_MODEL_URL)
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            news: default_news(),
            preprint: default_preprint(),
            repository: default_repository(),
            model: default_model(),
        }
    }
}

impl SourcesConfig {
    pub fn get(&self, origin: Origin) -> &SourceConfig {
        match origin {
            Origin::News => &self.news,
            Origin::Preprint => &self.preprint,
            Origin::Repository => &self.repository,
            Origin::Model => &self.model,
        }
    }
}
