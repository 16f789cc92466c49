// CPU utilization: two reads of the kernel counter file, falling back to a per-core delta cache.

mod delta;
mod parser;

pub use delta::{CoreTimes, DeltaCache, compute_utilization, utilization};
pub use parser::{StatCounters, parse_proc_stat};

use crate::error::{CollectError, SourceError};
use crate::host_probe::HostProbe;
use crate::models::CpuSample;
use crate::sampled::Sampled;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

pub struct CpuSampler<P> {
    probe: Arc<P>,
    stat_path: PathBuf,
    sample_delay: Duration,
    /// Held across the counter read and cache update so overlapping polls don't interleave.
    baseline: Mutex<DeltaCache>,
}

impl<P: HostProbe> CpuSampler<P> {
    pub fn new(probe: Arc<P>, stat_path: impl Into<PathBuf>, sample_delay: Duration) -> Self {
        Self {
            probe,
            stat_path: stat_path.into(),
            sample_delay,
            baseline: Mutex::new(DeltaCache::default()),
        }
    }

    /// Never fails for source reasons; only an internal fault (task panic, poisoned lock)
    /// is returned as an error.
    #[instrument(skip(self), fields(sampler = "cpu"))]
    pub async fn sample(&self) -> Result<Sampled<CpuSample>, CollectError> {
        match self.read_counter_file().await {
            Ok(sample) => return Ok(Sampled::Success(sample)),
            Err(e) => debug!(
                error = %e,
                path = %self.stat_path.display(),
                "counter file unavailable; using per-core delta cache"
            ),
        }

        let mut cache = self.baseline.lock().await;
        let probe = self.probe.clone();
        let times = tokio::task::spawn_blocking(move || probe.core_times())
            .await
            .map_err(|source| CollectError::Task {
                operation: "core_times",
                source,
            })??;

        Ok(match times {
            Some(times) if !times.is_empty() => {
                let reason = if cache.is_empty() {
                    "counter file unavailable; first delta-cache sample has no baseline"
                } else {
                    "counter file unavailable; delta against previous poll"
                };
                Sampled::degraded(cache.advance(&times), reason)
            }
            _ => Sampled::degraded(CpuSample::idle(), "no CPU counters available"),
        })
    }

    async fn read_counter_file(&self) -> Result<CpuSample, SourceError> {
        let first = parse_proc_stat(&tokio::fs::read_to_string(&self.stat_path).await?)?;
        tokio::time::sleep(self.sample_delay).await;
        let second = parse_proc_stat(&tokio::fs::read_to_string(&self.stat_path).await?)?;
        Ok(compute_utilization(&first, &second))
    }
}
