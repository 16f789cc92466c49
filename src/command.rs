// External command execution (df, sar, docker, nvidia-smi)

use crate::error::CommandError;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs a program to completion and returns its stdout.
///
/// Samplers only go through this trait, so tests can substitute captured output.
pub trait CommandRunner: Send + Sync + 'static {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, CommandError>> + Send;
}

/// Spawns real child processes via `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// `None` waits forever; otherwise the child is killed once `timeout` elapses.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| CommandError::TimedOut {
                    program: program.to_string(),
                    after: limit,
                })?,
            None => cmd.output().await,
        }
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: program.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if !output.stderr.is_empty() {
            tracing::debug!(
                program,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "command wrote to stderr"
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
