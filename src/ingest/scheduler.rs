// src/ingest/scheduler.rs
use metrics::counter;
use tokio::task::JoinHandle;

use crate::ingest::Ingestor;

#[derive(Clone, Copy, Debug)]
pub struct RefreshSchedulerCfg {
    /// 0 disables periodic refresh.
    pub interval_secs: u64,
}

/// Spawn a background loop that re-fetches every origin each interval.
/// The first tick fires after one full interval; startup does its own fetch.
/// Returns `None` when the interval is 0.
pub fn spawn_refresh_scheduler(
    cfg: RefreshSchedulerCfg,
    ingestor: Ingestor,
) -> Option<JoinHandle<()>> {
    if cfg.interval_secs == 0 {
        tracing::info!(target: "ingest", "periodic refresh disabled");
        return None;
    }
    let period = std::time::Duration::from_secs(cfg.interval_secs);
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            counter!("ingest_runs_total").increment(1);
            ingestor.run_once().await;
            tracing::info!(
                target: "ingest",
                origins = ingestor.origins().len(),
                "scheduled refresh tick"
            );
        }
    }))
}
