// GPU models

use serde::{Deserialize, Serialize};

/// One row of `nvidia-smi --query-gpu` output. Power in W, memory in MB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuSample {
    pub power_draw: f64,
    pub power_limit: f64,
    pub utilization: f64,
    pub memory_used: f64,
    pub memory_total: f64,
}
