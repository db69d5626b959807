//! Feed aggregator service, binary entrypoint.
//! Loads config, starts the per-origin fetches and the refresh scheduler, and
//! serves the Axum router.

use feed_aggregator::config::AggregatorConfig;
use feed_aggregator::ingest::scheduler::{spawn_refresh_scheduler, RefreshSchedulerCfg};
use feed_aggregator::origin::ActiveOrigin;
use feed_aggregator::telemetry::{init_tracing, Metrics};
use feed_aggregator::{api, build_ingestor};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AggregatorConfig::load_default()?;
    tracing::info!(
        refresh_interval_secs = cfg.refresh_interval_secs,
        request_timeout_secs = cfg.request_timeout_secs,
        "config loaded"
    );

    let metrics = Metrics::init(cfg.refresh_interval_secs)?;
    let ingestor = build_ingestor(&cfg)?;

    // Initial fetch: every origin loads independently; the API serves partial
    // results while the slower ones are still pending.
    let started = ingestor.spawn_refresh(ActiveOrigin::All);
    tracing::info!(origins = started.len(), "initial fetch started");

    spawn_refresh_scheduler(
        RefreshSchedulerCfg {
            interval_secs: cfg.refresh_interval_secs,
        },
        ingestor.clone(),
    );

    let router = api::router(api::AppState::new(ingestor)).merge(metrics.router());
    Ok(router.into())
}
