// Container listing by parsing `docker ps` table output.

mod parser;

pub use parser::parse_docker_ps;

use crate::command::CommandRunner;
use crate::models::DockerSample;
use crate::sampled::Sampled;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Column template passed to `docker ps --format`; docker expands `\t` itself.
const PS_FORMAT: &str = r"table {{.ID}}\t{{.Names}}\t{{.Image}}\t{{.Status}}\t{{.Ports}}";

pub struct DockerLister<R> {
    runner: Arc<R>,
    include_stopped: bool,
}

impl<R: CommandRunner> DockerLister<R> {
    pub fn new(runner: Arc<R>, include_stopped: bool) -> Self {
        Self {
            runner,
            include_stopped,
        }
    }

    /// Missing binary or stopped daemon yields an empty list.
    #[instrument(skip(self), fields(sampler = "docker"))]
    pub async fn list(&self) -> Sampled<DockerSample> {
        let mut args = vec!["ps"];
        if self.include_stopped {
            args.push("-a");
        }
        args.extend(["--format", PS_FORMAT]);

        match self.runner.run("docker", &args).await {
            Ok(output) => Sampled::Success(DockerSample {
                containers: parse_docker_ps(&output),
            }),
            Err(e) => {
                debug!(error = %e, operation = "docker_ps", "docker unavailable");
                Sampled::degraded(DockerSample::default(), format!("docker unavailable: {e}"))
            }
        }
    }
}
