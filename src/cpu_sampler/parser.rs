// Parser for the kernel per-CPU counter file (/proc/stat).

use super::delta::CoreTimes;
use crate::error::ParseError;

/// Counters from one read of the counter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCounters {
    pub aggregate: CoreTimes,
    /// `(core index, counters)` in file order.
    pub cores: Vec<(u32, CoreTimes)>,
}

/// Parses `cpu` / `cpuN` lines. Other lines and malformed cpu lines are skipped;
/// a missing aggregate `cpu` line is an error.
pub fn parse_proc_stat(content: &str) -> Result<StatCounters, ParseError> {
    let mut aggregate = None;
    let mut cores = Vec::new();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let Some(suffix) = fields.next().and_then(|label| label.strip_prefix("cpu")) else {
            continue;
        };
        let Some(times) = parse_times(fields) else {
            tracing::debug!(line, "skipping malformed counter line");
            continue;
        };
        if suffix.is_empty() {
            aggregate.get_or_insert(times);
        } else if let Ok(id) = suffix.parse::<u32>() {
            cores.push((id, times));
        }
    }
    aggregate
        .map(|aggregate| StatCounters { aggregate, cores })
        .ok_or(ParseError::MissingCounterLine("cpu"))
}

/// Total is the sum of every field; idle is the fourth.
fn parse_times<'a>(fields: impl Iterator<Item = &'a str>) -> Option<CoreTimes> {
    let values: Vec<u64> = fields.map(|f| f.parse().ok()).collect::<Option<_>>()?;
    let idle = *values.get(3)?;
    Some(CoreTimes {
        total: values.iter().sum(),
        idle,
    })
}
