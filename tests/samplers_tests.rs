// Network, docker and GPU samplers over a fake command runner

mod common;

use common::{FakeRunner, fixture};
use hostmon::docker_lister::DockerLister;
use hostmon::gpu_sampler::GpuSampler;
use hostmon::network_sampler::NetworkSampler;
use hostmon::sampled::{Sampled, SourceStatus};
use std::sync::Arc;

#[tokio::test]
async fn network_reports_interfaces() {
    let runner = Arc::new(FakeRunner::new().with("sar", fixture("sar_dev.txt")));
    let sampled = NetworkSampler::new(runner.clone()).sample().await;
    let net = match sampled {
        Sampled::Success(v) => v,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(net.interfaces.len(), 2);
    assert_eq!(runner.invocations(), vec![vec!["sar", "-n", "DEV", "1", "1"]]);
}

#[tokio::test]
async fn network_without_summary_is_empty() {
    let runner = Arc::new(FakeRunner::new().with("sar", fixture("sar_no_header.txt")));
    let sampled = NetworkSampler::new(runner).sample().await;
    assert_eq!(sampled, Sampled::Empty);
    assert!(sampled.into_value().interfaces.is_empty());
}

#[tokio::test]
async fn network_only_loopback_is_empty() {
    let out = "Average: IFACE rxkB/s txkB/s\nAverage: lo 1.00 1.00\n";
    let runner = Arc::new(FakeRunner::new().with("sar", out));
    assert_eq!(NetworkSampler::new(runner).sample().await, Sampled::Empty);
}

#[tokio::test]
async fn network_missing_sar_degrades() {
    let sampled = NetworkSampler::new(Arc::new(FakeRunner::new())).sample().await;
    let SourceStatus::Degraded { reason } = sampled.status() else {
        panic!("expected degraded");
    };
    assert!(reason.contains("sar"));
    assert!(sampled.into_value().interfaces.is_empty());
}

#[tokio::test]
async fn docker_lists_running_containers() {
    let runner = Arc::new(FakeRunner::new().with("docker", fixture("docker_ps.txt")));
    let sampled = DockerLister::new(runner.clone(), false).list().await;
    assert_eq!(sampled.status(), SourceStatus::Success);
    assert_eq!(sampled.into_value().containers.len(), 2);

    let call = &runner.invocations()[0];
    assert_eq!(call[0..2], ["docker", "ps"]);
    assert!(!call.iter().any(|a| a == "-a"));
    assert!(call.iter().any(|a| a.starts_with("table {{.ID}}")));
}

#[tokio::test]
async fn docker_include_stopped_passes_all_flag() {
    let runner = Arc::new(FakeRunner::new().with("docker", fixture("docker_ps_spaces.txt")));
    let sampled = DockerLister::new(runner.clone(), true).list().await;
    assert_eq!(sampled.into_value().containers.len(), 2);
    assert_eq!(runner.invocations()[0][2], "-a");
}

#[tokio::test]
async fn docker_absent_is_empty_list() {
    let sampled = DockerLister::new(Arc::new(FakeRunner::new()), false)
        .list()
        .await;
    assert!(matches!(sampled.status(), SourceStatus::Degraded { .. }));
    assert!(sampled.into_value().containers.is_empty());
}

#[tokio::test]
async fn gpu_reports_each_device() {
    let runner = Arc::new(FakeRunner::new().with("nvidia-smi", fixture("nvidia_smi.csv")));
    let sampled = GpuSampler::new(runner.clone()).sample().await;
    assert_eq!(sampled.status(), SourceStatus::Success);
    assert_eq!(sampled.into_value().len(), 2);

    let call = &runner.invocations()[0];
    assert_eq!(call[0], "nvidia-smi");
    assert!(call.iter().any(|a| a.contains("power.draw")));
}

#[tokio::test]
async fn gpu_tool_reporting_no_devices_is_success() {
    let runner = Arc::new(FakeRunner::new().with("nvidia-smi", ""));
    let sampled = GpuSampler::new(runner).sample().await;
    assert_eq!(sampled, Sampled::Success(vec![]));
}

#[tokio::test]
async fn gpu_tool_missing_is_degraded_and_empty() {
    let sampled = GpuSampler::new(Arc::new(FakeRunner::new())).sample().await;
    let SourceStatus::Degraded { reason } = sampled.status() else {
        panic!("expected degraded");
    };
    assert!(reason.starts_with("GPU tooling unavailable"));
    assert!(sampled.into_value().is_empty());
}
