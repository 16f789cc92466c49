// Snapshot models (wire format of /api/monitoring-data)

mod container;
mod gpu;
mod network;
mod storage;
mod system;

pub use container::{DockerContainer, DockerSample};
pub use gpu::GpuSample;
pub use network::{InterfaceRate, NetworkSample};
pub use storage::{BlockDevice, DiskSample, RootUsage};
pub use system::{
    CoreUtilization, CpuSample, MemorySample, MemoryTotals, Snapshot, SystemSample, bytes_to_mb,
    round1,
};
