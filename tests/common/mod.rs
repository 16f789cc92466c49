// Shared test helpers: captured fixtures and fakes for the command / host-probe seams

#![allow(dead_code)]

use hostmon::command::CommandRunner;
use hostmon::config::CollectorConfig;
use hostmon::cpu_sampler::CoreTimes;
use hostmon::error::{CollectError, CommandError};
use hostmon::host_probe::{FsUsage, HostProbe};
use hostmon::models::{
    BlockDevice, CpuSample, DiskSample, DockerContainer, DockerSample, GpuSample, InterfaceRate,
    MemorySample, MemoryTotals, NetworkSample, RootUsage, Snapshot, SystemSample,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const GIB: u64 = 1024 * 1024 * 1024;

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read fixture {}: {}", path, e))
}

/// Returns canned stdout per program; programs without an entry behave as "not installed".
#[derive(Default)]
pub struct FakeRunner {
    outputs: HashMap<String, String>,
    invocations: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, program: &str, stdout: impl Into<String>) -> Self {
        self.outputs.insert(program.to_string(), stdout.into());
        self
    }

    /// Every call so far as `[program, args...]`.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.invocations.lock().unwrap().push(call);
        self.outputs
            .get(program)
            .cloned()
            .ok_or_else(|| CommandError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            })
    }
}

/// Host probe with fixed values; core tick readings are handed out in order.
pub struct FakeProbe {
    pub memory: MemoryTotals,
    pub load: [f64; 3],
    pub root: Option<FsUsage>,
    pub core_times: Mutex<VecDeque<Vec<CoreTimes>>>,
    pub fail_memory: bool,
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self {
            memory: MemoryTotals {
                total: 16 * GIB,
                free: 4 * GIB,
                available: 8 * GIB,
            },
            load: [0.5, 0.75, 1.0],
            root: Some(FsUsage {
                total_bytes: 100 * GIB,
                free_bytes: 25 * GIB,
            }),
            core_times: Mutex::new(VecDeque::new()),
            fail_memory: false,
        }
    }
}

impl FakeProbe {
    pub fn with_core_times(readings: Vec<Vec<CoreTimes>>) -> Self {
        Self {
            core_times: Mutex::new(readings.into()),
            ..Self::default()
        }
    }
}

impl HostProbe for FakeProbe {
    fn memory(&self) -> Result<MemoryTotals, CollectError> {
        if self.fail_memory {
            return Err(CollectError::LockPoisoned("fake memory"));
        }
        Ok(self.memory)
    }

    fn load_average(&self) -> [f64; 3] {
        self.load
    }

    fn root_filesystem(&self) -> Result<Option<FsUsage>, CollectError> {
        Ok(self.root)
    }

    fn core_times(&self) -> Result<Option<Vec<CoreTimes>>, CollectError> {
        Ok(self.core_times.lock().unwrap().pop_front())
    }
}

pub fn core(total: u64, idle: u64) -> CoreTimes {
    CoreTimes { total, idle }
}

/// Collector config whose counter file does not exist, forcing the CPU fallback path.
pub fn config_without_proc_stat() -> CollectorConfig {
    CollectorConfig {
        proc_stat_path: "/nonexistent/hostmon/stat".into(),
        cpu_sample_delay_ms: 1,
        ..CollectorConfig::default()
    }
}

/// Runner where every tool is present with realistic output.
pub fn full_runner() -> FakeRunner {
    FakeRunner::new()
        .with("df", fixture("df_h.txt"))
        .with("sar", fixture("sar_dev.txt"))
        .with("docker", fixture("docker_ps.txt"))
        .with("nvidia-smi", fixture("nvidia_smi.csv"))
}

/// Hand-built snapshot with every category populated.
pub fn sample_snapshot() -> Snapshot {
    let nvme = BlockDevice {
        path: "/dev/nvme0n1p2".into(),
        mount_point: "/".into(),
        total: 936960,
        used: 814080,
        free: 75776,
        percentage: 92,
        human_size: "915G".into(),
        human_used: "795G".into(),
        human_free: "74G".into(),
    };
    Snapshot {
        timestamp: "2024-03-14T10:15:02.000Z".into(),
        cpu: CpuSample::new(42.5, [40.0, 45.0]),
        memory: MemorySample::from(MemoryTotals {
            total: 16 * GIB,
            free: 4 * GIB,
            available: 8 * GIB,
        }),
        gpus: vec![GpuSample {
            power_draw: 287.45,
            power_limit: 450.0,
            utilization: 93.0,
            memory_used: 21504.0,
            memory_total: 24564.0,
        }],
        disk: DiskSample::new(RootUsage::from(&nvme), vec![nvme]),
        network: NetworkSample {
            interfaces: vec![InterfaceRate {
                iface: "enp5s0".into(),
                rx_kbs: 987.21,
                tx_kbs: 58.34,
            }],
        },
        docker: DockerSample {
            containers: vec![DockerContainer {
                id: "3f4e5d6c7b8a".into(),
                name: "grafana".into(),
                image: "grafana/grafana:10.2.3".into(),
                status: "Up 2 hours".into(),
                ports: vec!["0.0.0.0:3000->3000/tcp".into()],
            }],
        },
        system: SystemSample {
            load_average: [0.5, 0.75, 1.0],
            free_memory: 4 * GIB,
            total_memory: 16 * GIB,
        },
    }
}
