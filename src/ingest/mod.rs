// src/ingest/mod.rs
pub mod providers;
pub mod scheduler;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::ingest::types::SourceProvider;
use crate::normalize::{normalize_all, now_ms};
use crate::origin::{ActiveOrigin, Origin};
use crate::store::OriginStore;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_fetch_total", "Fetches started, per origin.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors, per origin."
        );
        describe_counter!("ingest_items_total", "Items normalized, per origin.");
        describe_counter!(
            "ingest_stale_drops_total",
            "Fetch results dropped because a newer fetch superseded them."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!("ingest_origin_items", "Items currently served, per origin.");
        describe_gauge!(
            "ingest_last_refresh_ts",
            "Unix ts of the last applied fetch result."
        );
    });
}

/// Fetch one origin through `provider`, normalize, and write the result into
/// `store`. Returns whether the result was applied (a newer fetch wins).
pub async fn refresh_with(provider: &dyn SourceProvider, store: &OriginStore) -> bool {
    ensure_metrics_described();
    let origin = provider.origin();
    let ticket = store.begin_fetch(origin);
    counter!("ingest_fetch_total", "origin" => origin.as_str()).increment(1);

    let result = match provider.fetch_latest().await {
        Ok(raws) => {
            let items = normalize_all(&raws, origin, now_ms());
            counter!("ingest_items_total", "origin" => origin.as_str())
                .increment(items.len() as u64);
            tracing::info!(
                target: "ingest",
                %origin,
                provider = provider.name(),
                items = items.len(),
                "source ready"
            );
            Ok(items)
        }
        Err(e) => {
            let message = format!("{e:#}");
            tracing::warn!(
                target: "ingest",
                %origin,
                provider = provider.name(),
                error = %message,
                "provider error"
            );
            counter!("ingest_provider_errors_total", "origin" => origin.as_str()).increment(1);
            Err(message)
        }
    };

    let count = result.as_ref().map(Vec::len).ok();
    let applied = store.complete(ticket, result);
    if applied {
        if let Some(n) = count {
            gauge!("ingest_origin_items", "origin" => origin.as_str()).set(n as f64);
        }
        gauge!("ingest_last_refresh_ts").set(chrono::Utc::now().timestamp() as f64);
    } else {
        counter!("ingest_stale_drops_total", "origin" => origin.as_str()).increment(1);
        tracing::debug!(target: "ingest", %origin, "superseded fetch result dropped");
    }
    applied
}

/// Owns the adapters and the store they feed.
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<OriginStore>,
    providers: Arc<Vec<Arc<dyn SourceProvider>>>,
}

impl Ingestor {
    pub fn new(store: Arc<OriginStore>, providers: Vec<Arc<dyn SourceProvider>>) -> Self {
        Self {
            store,
            providers: Arc::new(providers),
        }
    }

    pub fn store(&self) -> &Arc<OriginStore> {
        &self.store
    }

    /// Origins that have an adapter, in union order.
    pub fn origins(&self) -> Vec<Origin> {
        Origin::ALL
            .into_iter()
            .filter(|&o| self.providers.iter().any(|p| p.origin() == o))
            .collect()
    }

    fn provider(&self, origin: Origin) -> Option<Arc<dyn SourceProvider>> {
        self.providers.iter().find(|p| p.origin() == origin).cloned()
    }

    /// Fetch one origin and wait for it. `false` if the origin has no adapter
    /// or the result was superseded.
    pub async fn refresh_origin(&self, origin: Origin) -> bool {
        match self.provider(origin) {
            Some(p) => refresh_with(p.as_ref(), &self.store).await,
            None => false,
        }
    }

    /// Start one independent task per selected origin; completions land in
    /// any order. Origins without an adapter are skipped.
    pub fn spawn_refresh(&self, selection: ActiveOrigin) -> Vec<(Origin, JoinHandle<bool>)> {
        selection
            .origins()
            .into_iter()
            .filter_map(|origin| {
                let Some(p) = self.provider(origin) else {
                    tracing::debug!(target: "ingest", %origin, "no adapter; skipped");
                    return None;
                };
                let store = Arc::clone(&self.store);
                let handle = tokio::spawn(async move { refresh_with(p.as_ref(), &store).await });
                Some((origin, handle))
            })
            .collect()
    }

    /// Refresh every origin concurrently and wait for all of them.
    pub async fn run_once(&self) {
        for (origin, handle) in self.spawn_refresh(ActiveOrigin::All) {
            if let Err(e) = handle.await {
                tracing::error!(target: "ingest", %origin, error = ?e, "refresh task panicked");
            }
        }
    }
}
