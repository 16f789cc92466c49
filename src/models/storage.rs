// Storage / disk models

use serde::{Deserialize, Serialize};

use super::system::{bytes_to_mb, round1};

/// Root filesystem usage in MB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_free: Option<String>,
}

impl RootUsage {
    /// Build from raw byte counts; used = total - free, percentage clamped to [0,100].
    pub fn from_bytes(total_bytes: u64, free_bytes: u64) -> Self {
        let used_bytes = total_bytes.saturating_sub(free_bytes);
        let percentage = if total_bytes > 0 {
            (used_bytes as f64 / total_bytes as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        Self {
            total: bytes_to_mb(total_bytes as f64),
            used: bytes_to_mb(used_bytes as f64),
            free: bytes_to_mb(free_bytes as f64),
            percentage: round1(percentage),
            human_size: None,
            human_used: None,
            human_free: None,
        }
    }
}

impl From<&BlockDevice> for RootUsage {
    fn from(d: &BlockDevice) -> Self {
        Self {
            total: d.total,
            used: d.used,
            free: d.free,
            percentage: d.percentage as f64,
            human_size: Some(d.human_size.clone()),
            human_used: Some(d.human_used.clone()),
            human_free: Some(d.human_free.clone()),
        }
    }
}

/// One `df -h` row for a device under the high-speed storage prefix. Sizes in MB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDevice {
    pub path: String,
    pub mount_point: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percentage: u8,
    pub human_size: String,
    pub human_used: String,
    pub human_free: String,
}

/// Note: total >= used + free does not hold in general (reserved blocks, stale df output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSample {
    pub root: RootUsage,
    pub nvme_devices: Vec<BlockDevice>,
    pub total_nvme_count: usize,
}

impl DiskSample {
    pub fn new(root: RootUsage, nvme_devices: Vec<BlockDevice>) -> Self {
        let total_nvme_count = nvme_devices.len();
        Self {
            root,
            nvme_devices,
            total_nvme_count,
        }
    }

    /// Literal values returned when disk sampling fails unexpectedly.
    pub fn fallback_defaults() -> Self {
        Self::new(
            RootUsage {
                total: 10240,
                used: 5120,
                free: 5120,
                percentage: 50.0,
                human_size: None,
                human_used: None,
                human_free: None,
            },
            Vec::new(),
        )
    }
}

impl Default for DiskSample {
    fn default() -> Self {
        Self::fallback_defaults()
    }
}
