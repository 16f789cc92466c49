// Tagged per-source results so callers can see which fallback tier produced a value.

use serde::{Deserialize, Serialize};

/// Outcome of one sampler for one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Sampled<T> {
    /// Produced by the preferred source.
    Success(T),
    /// Produced by a fallback tier or a default; `reason` says which and why.
    Degraded { value: T, reason: String },
    /// The source ran but had nothing to report.
    Empty,
}

impl<T> Sampled<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Sampled::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Sampled::Success(v) | Sampled::Degraded { value: v, .. } => Some(v),
            Sampled::Empty => None,
        }
    }

    pub fn status(&self) -> SourceStatus {
        match self {
            Sampled::Success(_) => SourceStatus::Success,
            Sampled::Degraded { reason, .. } => SourceStatus::Degraded {
                reason: reason.clone(),
            },
            Sampled::Empty => SourceStatus::Empty,
        }
    }
}

impl<T: Default> Sampled<T> {
    pub fn into_value(self) -> T {
        match self {
            Sampled::Success(v) | Sampled::Degraded { value: v, .. } => v,
            Sampled::Empty => T::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceStatus {
    Success,
    Degraded { reason: String },
    Empty,
}

/// Which tier served each category in the most recent poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub timestamp: String,
    pub cpu: SourceStatus,
    pub gpus: SourceStatus,
    pub disk: SourceStatus,
    pub network: SourceStatus,
    pub docker: SourceStatus,
}
