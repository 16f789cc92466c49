// CPU, memory, host and snapshot models

use serde::{Deserialize, Serialize};

use super::{DiskSample, DockerSample, GpuSample, NetworkSample};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Bytes to whole megabytes (rounded to nearest).
pub fn bytes_to_mb(bytes: f64) -> u64 {
    if bytes <= 0.0 {
        return 0;
    }
    (bytes / BYTES_PER_MB).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreUtilization {
    pub usage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSample {
    pub usage: f64,
    pub cores: usize,
    /// Ascending by core index; always `cores` entries.
    pub core_utilizations: Vec<CoreUtilization>,
}

impl CpuSample {
    /// Per-core usages must already be ordered by core index.
    pub fn new(usage: f64, per_core: impl IntoIterator<Item = f64>) -> Self {
        let core_utilizations: Vec<CoreUtilization> = per_core
            .into_iter()
            .map(|usage| CoreUtilization {
                usage: usage.clamp(0.0, 100.0),
            })
            .collect();
        Self {
            usage: usage.clamp(0.0, 100.0),
            cores: core_utilizations.len(),
            core_utilizations,
        }
    }

    /// Degraded value when no counters are available at all.
    pub fn idle() -> Self {
        Self::new(0.0, std::iter::empty())
    }
}

impl Default for CpuSample {
    fn default() -> Self {
        Self::idle()
    }
}

/// Raw host memory counters in bytes, as read from the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryTotals {
    pub total: u64,
    pub free: u64,
    pub available: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub percentage: f64,
}

impl From<MemoryTotals> for MemorySample {
    fn from(m: MemoryTotals) -> Self {
        let used = m.total.saturating_sub(m.free);
        let percentage = if m.total > 0 {
            (used as f64 / m.total as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        Self {
            total: bytes_to_mb(m.total as f64),
            used: bytes_to_mb(used as f64),
            free: bytes_to_mb(m.free as f64),
            available: bytes_to_mb(m.available as f64),
            percentage: round1(percentage),
        }
    }
}

/// Host-level aggregates; memory here is in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSample {
    pub load_average: [f64; 3],
    pub free_memory: u64,
    pub total_memory: u64,
}

/// One complete poll. Built once by the aggregator and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub cpu: CpuSample,
    pub memory: MemorySample,
    pub gpus: Vec<GpuSample>,
    pub disk: DiskSample,
    pub network: NetworkSample,
    pub docker: DockerSample,
    pub system: SystemSample,
}
