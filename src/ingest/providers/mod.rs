// src/ingest/providers/mod.rs
//! Source adapters, one per origin.
//!
//! Every provider runs in one of two modes: `Fixture` parses a body held in
//! memory (tests, offline demos), `Http` performs a GET against the origin's
//! endpoint. Parsing is shared between both modes.

pub mod arxiv;
pub mod github;
pub mod hackernews;
pub mod huggingface;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::AggregatorConfig;
use crate::ingest::types::{FetchError, SourceProvider};
use crate::origin::Origin;

pub use arxiv::ArxivProvider;
pub use github::GithubProvider;
pub use hackernews::HackerNewsProvider;
pub use huggingface::HuggingFaceProvider;

pub(crate) enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl Mode {
    pub(crate) async fn body(&self, provider: &'static str) -> Result<String> {
        match self {
            Mode::Fixture(s) => Ok(s.clone()),
            Mode::Http { url, client } => {
                tracing::debug!(target: "ingest", provider, %url, "fetching");
                get_text(client, url).await
            }
        }
    }
}

/// GET `url` and return the body. A non-success status is an error carrying
/// the status; transport failures pass through untouched.
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().await.map_err(FetchError::Transport)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status { status }.into());
    }
    Ok(resp.text().await.map_err(FetchError::Transport)?)
}

/// Shared HTTP client for all adapters.
pub fn build_http_client(cfg: &AggregatorConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .connect_timeout(Duration::from_secs(cfg.request_timeout_secs.min(10)))
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .context("building http client")
}

/// HTTP providers for every origin enabled in `cfg`, in union order.
pub fn from_config(cfg: &AggregatorConfig) -> Result<Vec<Arc<dyn SourceProvider>>> {
    let client = build_http_client(cfg)?;
    let mut out: Vec<Arc<dyn SourceProvider>> = Vec::new();
    for origin in Origin::ALL {
        let src = cfg.source(origin);
        if !src.enabled {
            tracing::info!(target: "ingest", %origin, "source disabled in config");
            continue;
        }
        let url = src.url.clone();
        let client = client.clone();
        let p: Arc<dyn SourceProvider> = match origin {
            Origin::News => Arc::new(HackerNewsProvider::from_url(url, client)),
            Origin::Preprint => Arc::new(ArxivProvider::from_url(url, client)),
            Origin::Repository => Arc::new(GithubProvider::from_url(url, client)),
            Origin::Model => Arc::new(HuggingFaceProvider::from_url(url, client)),
        };
        out.push(p);
    }
    Ok(out)
}

pub(crate) fn record_parse(t0: std::time::Instant, origin: Origin) {
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    metrics::histogram!("ingest_parse_ms", "origin" => origin.as_str()).record(ms);
}
