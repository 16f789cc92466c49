// Fans out to every sampler for one poll and composes the Snapshot.

use crate::command::{CommandRunner, SystemRunner};
use crate::config::CollectorConfig;
use crate::cpu_sampler::CpuSampler;
use crate::disk_resolver::DiskResolver;
use crate::docker_lister::DockerLister;
use crate::error::CollectError;
use crate::gpu_sampler::GpuSampler;
use crate::host_probe::{HostProbe, SysinfoProbe};
use crate::models::{MemorySample, Snapshot, SystemSample};
use crate::network_sampler::NetworkSampler;
use crate::sampled::{SourceReport, SourceStatus};
use chrono::SecondsFormat;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Aggregator over real commands and the sysinfo probe.
pub type HostAggregator = Aggregator<SystemRunner, SysinfoProbe>;

pub struct Aggregator<R, P> {
    probe: Arc<P>,
    cpu: CpuSampler<P>,
    disk: DiskResolver<R, P>,
    network: NetworkSampler<R>,
    docker: DockerLister<R>,
    gpu: GpuSampler<R>,
    last_report: RwLock<Option<SourceReport>>,
}

impl HostAggregator {
    pub fn from_config(config: &CollectorConfig) -> Self {
        let runner = Arc::new(SystemRunner::new(config.command_timeout()));
        Self::new(runner, Arc::new(SysinfoProbe::new()), config)
    }
}

impl<R: CommandRunner, P: HostProbe> Aggregator<R, P> {
    pub fn new(runner: Arc<R>, probe: Arc<P>, config: &CollectorConfig) -> Self {
        Self {
            cpu: CpuSampler::new(
                probe.clone(),
                &config.proc_stat_path,
                config.cpu_sample_delay(),
            ),
            disk: DiskResolver::new(runner.clone(), probe.clone(), &config.nvme_device_prefix),
            network: NetworkSampler::new(runner.clone()),
            docker: DockerLister::new(runner.clone(), config.docker_include_stopped),
            gpu: GpuSampler::new(runner),
            probe,
            last_report: RwLock::new(None),
        }
    }

    /// Samples every source concurrently. Source problems degrade individual categories;
    /// only an internal fault fails the poll, and then no snapshot is produced.
    #[instrument(skip(self), fields(operation = "poll"))]
    pub async fn poll(&self) -> Result<Snapshot, CollectError> {
        let (cpu, host, gpus, disk, network, docker) = tokio::join!(
            self.cpu.sample(),
            self.host_totals(),
            self.gpu.sample(),
            self.disk.resolve(),
            self.network.sample(),
            self.docker.list(),
        );
        let cpu = cpu?;
        let (memory, system) = host?;

        let timestamp = chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let report = SourceReport {
            timestamp: timestamp.clone(),
            cpu: cpu.status(),
            gpus: gpus.status(),
            disk: disk.status(),
            network: network.status(),
            docker: docker.status(),
        };
        for (source, status) in [
            ("cpu", &report.cpu),
            ("gpus", &report.gpus),
            ("disk", &report.disk),
            ("network", &report.network),
            ("docker", &report.docker),
        ] {
            if let SourceStatus::Degraded { reason } = status {
                debug!(source, reason = %reason, "degraded source");
            }
        }
        *self.last_report.write().await = Some(report);

        Ok(Snapshot {
            timestamp,
            cpu: cpu.into_value(),
            memory,
            gpus: gpus.into_value(),
            disk: disk.into_value(),
            network: network.into_value(),
            docker: docker.into_value(),
            system,
        })
    }

    /// Per-category status from the most recent successful poll.
    pub async fn last_report(&self) -> Option<SourceReport> {
        self.last_report.read().await.clone()
    }

    async fn host_totals(&self) -> Result<(MemorySample, SystemSample), CollectError> {
        let probe = self.probe.clone();
        tokio::task::spawn_blocking(move || {
            let mem = probe.memory()?;
            let system = SystemSample {
                load_average: probe.load_average(),
                free_memory: mem.free,
                total_memory: mem.total,
            };
            Ok((MemorySample::from(mem), system))
        })
        .await
        .map_err(|source| CollectError::Task {
            operation: "host_totals",
            source,
        })?
    }
}
