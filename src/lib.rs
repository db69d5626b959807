// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod card;
pub mod config;
pub mod ingest;
pub mod normalize;
pub mod origin;
pub mod query;
pub mod store;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::normalize::{normalize, normalize_at, NormalizedItem};
pub use crate::origin::{ActiveOrigin, Origin, SortKey};
pub use crate::query::{query, resolve_view, DisplayRecord, View};
pub use crate::store::{OriginState, OriginStore, SourcesSnapshot};

use std::sync::Arc;

use crate::config::AggregatorConfig;
use crate::ingest::Ingestor;

/// Build the HTTP-backed ingestor for every enabled origin.
pub fn build_ingestor(cfg: &AggregatorConfig) -> anyhow::Result<Ingestor> {
    let providers = ingest::providers::from_config(cfg)?;
    Ok(Ingestor::new(Arc::new(OriginStore::new()), providers))
}
