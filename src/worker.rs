// Background poller: samples on an interval and broadcasts snapshots to /ws/system clients.

use crate::aggregator::Aggregator;
use crate::command::CommandRunner;
use crate::host_probe::HostProbe;
use crate::models::Snapshot;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};

/// Rate limit for "no receivers" debug log (avoid logging every tick when no one is on /ws/system)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Aggregator, channel and shutdown for the worker.
pub struct WorkerDeps<R, P> {
    pub aggregator: Arc<Aggregator<R, P>>,
    pub tx: broadcast::Sender<Snapshot>,
    pub ws_system_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn<R: CommandRunner, P: HostProbe>(
    deps: WorkerDeps<R, P>,
    config: WorkerConfig,
) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        aggregator,
        tx,
        ws_system_connections,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(sample_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut polls_ok: u64 = 0;
        let mut polls_failed: u64 = 0;
        let mut last_no_receivers_log: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let snapshot = match aggregator.poll().await {
                        Ok(s) => s,
                        Err(e) => {
                            polls_failed += 1;
                            tracing::warn!(error = %e, operation = "poll", "snapshot poll failed");
                            continue;
                        }
                    };
                    polls_ok += 1;
                    if tx.send(snapshot).is_err() {
                        let should_log = last_no_receivers_log
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                        if should_log {
                            tracing::debug!(
                                operation = "broadcast_snapshot",
                                "No active WebSocket clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_log = Some(Instant::now());
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_system_clients = ws_system_connections.load(Ordering::Relaxed),
                        polls_ok,
                        polls_failed,
                        "app stats"
                    );
                }
            }
        }
    })
}
