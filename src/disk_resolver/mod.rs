// Root filesystem usage plus high-speed block devices, via three fallback tiers:
// the `df -h` device table, root filesystem stats, then a memory-based approximation.

mod parser;

pub use parser::{human_to_bytes, parse_df};

use crate::command::CommandRunner;
use crate::error::{CollectError, SourceError};
use crate::host_probe::HostProbe;
use crate::models::{BlockDevice, DiskSample, RootUsage};
use crate::sampled::Sampled;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

pub struct DiskResolver<R, P> {
    runner: Arc<R>,
    probe: Arc<P>,
    device_prefix: String,
}

impl<R: CommandRunner, P: HostProbe> DiskResolver<R, P> {
    pub fn new(runner: Arc<R>, probe: Arc<P>, device_prefix: impl Into<String>) -> Self {
        Self {
            runner,
            probe,
            device_prefix: device_prefix.into(),
        }
    }

    /// Always produces a value. Internal faults yield [`DiskSample::fallback_defaults`].
    #[instrument(skip(self), fields(sampler = "disk"))]
    pub async fn resolve(&self) -> Sampled<DiskSample> {
        match self.resolve_tiers().await {
            Ok(sample) => sample,
            Err(e) => {
                error!(error = %e, operation = "resolve_disk", "disk sampling failed; using defaults");
                Sampled::degraded(
                    DiskSample::fallback_defaults(),
                    format!("disk sampling failed: {e}"),
                )
            }
        }
    }

    async fn resolve_tiers(&self) -> Result<Sampled<DiskSample>, CollectError> {
        let devices = match self.list_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                match &e {
                    SourceError::Command(c) if c.is_not_found() => {
                        warn!(error = %e, "df not found; falling back to filesystem stats")
                    }
                    _ => debug!(error = %e, "device table unavailable"),
                }
                Vec::new()
            }
        };

        if let Some(root) = devices.iter().find(|d| d.mount_point == "/") {
            let root = RootUsage::from(root);
            return Ok(Sampled::Success(DiskSample::new(root, devices)));
        }
        if !devices.is_empty() {
            debug!(
                count = devices.len(),
                prefix = %self.device_prefix,
                "devices found but none mounted at /; using filesystem stats for root"
            );
        }

        let probe = self.probe.clone();
        let fs = tokio::task::spawn_blocking(move || probe.root_filesystem())
            .await
            .map_err(|source| CollectError::Task {
                operation: "root_filesystem",
                source,
            })??;
        if let Some(fs) = fs {
            let root = RootUsage::from_bytes(fs.total_bytes, fs.free_bytes);
            return Ok(Sampled::degraded(
                DiskSample::new(root, devices),
                format!(
                    "no {} device mounted at /; root from filesystem stats",
                    self.device_prefix
                ),
            ));
        }

        warn!("root filesystem stats unavailable; approximating root usage from system memory");
        let probe = self.probe.clone();
        let mem = tokio::task::spawn_blocking(move || probe.memory())
            .await
            .map_err(|source| CollectError::Task {
                operation: "memory",
                source,
            })??;
        Ok(Sampled::degraded(
            DiskSample::new(RootUsage::from_bytes(mem.total, mem.free), devices),
            "root filesystem stats unavailable; root is approximated from system memory, not disk",
        ))
    }

    async fn list_devices(&self) -> Result<Vec<BlockDevice>, SourceError> {
        let output = self.runner.run("df", &["-h"]).await?;
        Ok(parse_df(&output, &self.device_prefix))
    }
}
