// Host-level reads that are not external commands: memory, load, root filesystem, CPU ticks.

mod ticks;

use crate::cpu_sampler::CoreTimes;
use crate::error::CollectError;
use crate::models::MemoryTotals;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use sysinfo::{Disks, System};
use tracing::instrument;

pub use ticks::TickIntegrator;

/// Root filesystem capacity in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsUsage {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// Blocking OS reads. Callers run these on `spawn_blocking`.
pub trait HostProbe: Send + Sync + 'static {
    fn memory(&self) -> Result<MemoryTotals, CollectError>;

    fn load_average(&self) -> [f64; 3];

    /// `None` when the platform cannot report the filesystem mounted at `/`.
    fn root_filesystem(&self) -> Result<Option<FsUsage>, CollectError>;

    /// Cumulative per-core tick counters in core-index order; `None` when unavailable.
    fn core_times(&self) -> Result<Option<Vec<CoreTimes>>, CollectError>;
}

/// Production probe backed by `sysinfo`.
pub struct SysinfoProbe {
    sys: Mutex<System>,
    disks: Mutex<Disks>,
    ticks: Mutex<TickIntegrator>,
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        Self {
            sys: Mutex::new(sys),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            ticks: Mutex::new(TickIntegrator::default()),
        }
    }
}

/// Capacity from block counts. Free is every free block, reserved ones included.
#[cfg_attr(not(unix), allow(dead_code))]
fn fs_usage_from_blocks(blocks: u64, blocks_free: u64, fragment_size: u64) -> Option<FsUsage> {
    let total_bytes = blocks.saturating_mul(fragment_size);
    (total_bytes > 0).then(|| FsUsage {
        total_bytes,
        free_bytes: blocks_free.min(blocks).saturating_mul(fragment_size),
    })
}

#[cfg(unix)]
fn statvfs_root() -> Option<FsUsage> {
    match nix::sys::statvfs::statvfs("/") {
        Ok(st) => fs_usage_from_blocks(
            u64::from(st.blocks()),
            u64::from(st.blocks_free()),
            u64::from(st.fragment_size()),
        ),
        Err(e) => {
            tracing::debug!(error = %e, operation = "statvfs", "statvfs on / failed");
            None
        }
    }
}

fn lock<'a, T>(m: &'a Mutex<T>, what: &'static str) -> Result<MutexGuard<'a, T>, CollectError> {
    m.lock().map_err(|_| CollectError::LockPoisoned(what))
}

impl HostProbe for SysinfoProbe {
    #[instrument(skip(self), fields(probe = "sysinfo", operation = "memory"))]
    fn memory(&self) -> Result<MemoryTotals, CollectError> {
        let mut sys = lock(&self.sys, "sysinfo")?;
        sys.refresh_memory();
        Ok(MemoryTotals {
            total: sys.total_memory(),
            free: sys.free_memory(),
            available: sys.available_memory(),
        })
    }

    fn load_average(&self) -> [f64; 3] {
        let l = System::load_average();
        [l.one, l.five, l.fifteen]
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "root_filesystem"))]
    fn root_filesystem(&self) -> Result<Option<FsUsage>, CollectError> {
        let mut disks = lock(&self.disks, "sysinfo disks")?;
        disks.refresh(false);
        // sysinfo only confirms something is mounted at `/`; capacity comes from statvfs.
        let root = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .filter(|d| d.total_space() > 0);
        #[cfg(unix)]
        {
            Ok(root.and_then(|_| statvfs_root()))
        }
        #[cfg(not(unix))]
        {
            Ok(root.map(|d| FsUsage {
                total_bytes: d.total_space(),
                free_bytes: d.available_space(),
            }))
        }
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "core_times"))]
    fn core_times(&self) -> Result<Option<Vec<CoreTimes>>, CollectError> {
        let mut sys = lock(&self.sys, "sysinfo")?;
        sys.refresh_cpu_usage();
        let usages: Vec<f32> = sys.cpus().iter().map(|c| c.cpu_usage()).collect();
        drop(sys);
        if usages.is_empty() {
            return Ok(None);
        }
        let mut ticks = lock(&self.ticks, "tick integrator")?;
        Ok(Some(ticks.advance(&usages)))
    }
}
