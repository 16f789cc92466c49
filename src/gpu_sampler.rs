// GPU power, utilization and memory from `nvidia-smi` CSV output.

use crate::command::CommandRunner;
use crate::models::GpuSample;
use crate::sampled::Sampled;
use std::sync::Arc;
use tracing::{debug, instrument};

const QUERY: &str =
    "--query-gpu=power.draw,power.limit,utilization.gpu,memory.used,memory.total";
const FORMAT: &str = "--format=csv,nounits,noheader";

/// `[N/A]` and similar placeholders read as 0.
fn parse_value(field: &str) -> f64 {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// One GPU per line; lines with fewer than five fields are skipped.
pub fn parse_nvidia_smi(output: &str) -> Vec<GpuSample> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| {
            let f: Vec<f64> = line.split(',').map(parse_value).collect();
            if f.len() < 5 {
                debug!(line, "skipping short nvidia-smi row");
                return None;
            }
            Some(GpuSample {
                power_draw: f[0],
                power_limit: f[1],
                utilization: f[2],
                memory_used: f[3],
                memory_total: f[4],
            })
        })
        .collect()
}

pub struct GpuSampler<R> {
    runner: Arc<R>,
}

impl<R: CommandRunner> GpuSampler<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// A missing or failing tool is `Degraded` with an empty list; a working tool that reports
    /// no GPUs is `Success` with an empty list.
    #[instrument(skip(self), fields(sampler = "gpu"))]
    pub async fn sample(&self) -> Sampled<Vec<GpuSample>> {
        match self.runner.run("nvidia-smi", &[QUERY, FORMAT]).await {
            Ok(output) => Sampled::Success(parse_nvidia_smi(&output)),
            Err(e) => {
                debug!(error = %e, operation = "nvidia_smi", "GPU tooling unavailable");
                Sampled::degraded(Vec::new(), format!("GPU tooling unavailable: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_placeholders() {
        let out = "125.50, 350.00, 37, 8012, 24576\n[N/A], [N/A], 0, 10, 16384\n";
        let gpus = parse_nvidia_smi(out);
        assert_eq!(gpus.len(), 2);
        assert_eq!(gpus[0].power_draw, 125.5);
        assert_eq!(gpus[0].memory_total, 24576.0);
        assert_eq!(gpus[1].power_draw, 0.0);
        assert_eq!(gpus[1].memory_used, 10.0);
    }

    #[test]
    fn short_rows_are_skipped() {
        assert!(parse_nvidia_smi("1, 2, 3\n\n").is_empty());
    }
}
