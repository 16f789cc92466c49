use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub collectors: CollectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of snapshots kept in the broadcast channel for /ws/system (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Background poll interval feeding /ws/system.
    pub sample_interval_ms: u64,
    /// How often to log app stats (ws_system clients, polls ok/failed) at INFO level.
    pub stats_log_interval_secs: u64,
}

/// Sources and knobs for the samplers. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_proc_stat_path")]
    pub proc_stat_path: String,
    /// Delay between the two counter-file reads.
    #[serde(default = "default_cpu_sample_delay_ms")]
    pub cpu_sample_delay_ms: u64,
    /// Upper bound for any external command; 0 waits forever.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    #[serde(default = "default_nvme_device_prefix")]
    pub nvme_device_prefix: String,
    #[serde(default)]
    pub docker_include_stopped: bool,
}

fn default_proc_stat_path() -> String {
    "/proc/stat".into()
}

fn default_cpu_sample_delay_ms() -> u64 {
    50
}

fn default_command_timeout_ms() -> u64 {
    10_000
}

fn default_nvme_device_prefix() -> String {
    "/dev/nvme".into()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            proc_stat_path: default_proc_stat_path(),
            cpu_sample_delay_ms: default_cpu_sample_delay_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            nvme_device_prefix: default_nvme_device_prefix(),
            docker_include_stopped: false,
        }
    }
}

impl CollectorConfig {
    pub fn cpu_sample_delay(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_delay_ms)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_ms > 0).then(|| Duration::from_millis(self.command_timeout_ms))
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            !self.collectors.proc_stat_path.is_empty(),
            "collectors.proc_stat_path must be non-empty"
        );
        anyhow::ensure!(
            self.collectors.cpu_sample_delay_ms > 0,
            "collectors.cpu_sample_delay_ms must be > 0, got {}",
            self.collectors.cpu_sample_delay_ms
        );
        anyhow::ensure!(
            !self.collectors.nvme_device_prefix.is_empty(),
            "collectors.nvme_device_prefix must be non-empty"
        );
        Ok(())
    }
}
