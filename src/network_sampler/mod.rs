// Per-interface throughput from a one-shot `sar -n DEV 1 1` report.

mod parser;

pub use parser::parse_sar_average;

use crate::command::CommandRunner;
use crate::models::NetworkSample;
use crate::sampled::Sampled;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct NetworkSampler<R> {
    runner: Arc<R>,
}

impl<R: CommandRunner> NetworkSampler<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// Blocks for about one second while sar samples. No data is `Empty`, not an error.
    #[instrument(skip(self), fields(sampler = "network"))]
    pub async fn sample(&self) -> Sampled<NetworkSample> {
        let output = match self.runner.run("sar", &["-n", "DEV", "1", "1"]).await {
            Ok(o) => o,
            Err(e) => {
                if e.is_not_found() {
                    warn!(error = %e, "sar not installed; network rates unavailable");
                } else {
                    debug!(error = %e, "sar failed");
                }
                return Sampled::degraded(NetworkSample::default(), format!("sar unavailable: {e}"));
            }
        };
        match parse_sar_average(&output) {
            Ok(interfaces) if !interfaces.is_empty() => {
                Sampled::Success(NetworkSample { interfaces })
            }
            Ok(_) => Sampled::Empty,
            Err(e) => {
                debug!(error = %e, "no summary rows in sar output");
                Sampled::Empty
            }
        }
    }
}
