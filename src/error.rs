// Error types for command execution, text parsing and snapshot collection

use std::time::Duration;
use thiserror::Error;

/// Failure to run an external command to completion.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with status {status:?}: {stderr}")]
    Failed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("`{program}` timed out after {after:?}")]
    TimedOut { program: String, after: Duration },
}

impl CommandError {
    /// True when the binary itself is missing (tool not installed).
    pub fn is_not_found(&self) -> bool {
        matches!(self, CommandError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// A whole-document parse failure. Malformed individual records are skipped, not reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no `{0}` line in counter source")]
    MissingCounterLine(&'static str),
    #[error("no header row with interface and receive-rate columns")]
    MissingHeader,
}

/// Why a single fallback tier produced nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Unexpected internal fault while collecting; fails the whole poll.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{operation}: blocking task failed: {source}")]
    Task {
        operation: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}
