// src/ingest/types.rs
use anyhow::Result;
use serde_json::{Map, Value};

use crate::origin::Origin;

/// Raw record as returned by a source adapter (a JSON object). Read-only.
pub type RawItem = Map<String, Value>;

/// Adapter-boundary failures. Wrapped in `anyhow::Error` by providers.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Upstream answered with a non-success status.
    #[error("Network response was not ok (HTTP {status})")]
    Status { status: reqwest::StatusCode },

    /// Request never produced a response (DNS, TLS, timeout, ...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body could not be decoded into the origin's raw shape.
    #[error("unexpected {origin} response: {message}")]
    Parse { origin: Origin, message: String },
}

impl FetchError {
    pub fn parse(origin: Origin, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            origin,
            message: message.to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Fetch the origin's current page of raw items.
    async fn fetch_latest(&self) -> Result<Vec<RawItem>>;
    fn origin(&self) -> Origin;
    fn name(&self) -> &'static str;
}
