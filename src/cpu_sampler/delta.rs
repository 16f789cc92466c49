// Delta-based utilization and the per-core baseline cache used by the fallback path.

use super::parser::StatCounters;
use crate::models::{CpuSample, round1};
use std::collections::HashMap;

/// Cumulative ticks for one CPU line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreTimes {
    pub total: u64,
    pub idle: u64,
}

/// `(Δtotal − Δidle) / Δtotal × 100`, clamped to [0,100], one decimal. Zero when Δtotal is zero.
pub fn utilization(prev: CoreTimes, curr: CoreTimes) -> f64 {
    let total = curr.total.saturating_sub(prev.total);
    if total == 0 {
        return 0.0;
    }
    let idle = curr.idle.saturating_sub(prev.idle);
    let busy = total.saturating_sub(idle);
    round1((busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
}

/// Utilization between two reads of the counter file. Cores missing from either read are
/// dropped; the result is sorted by core index.
pub fn compute_utilization(before: &StatCounters, after: &StatCounters) -> CpuSample {
    let mut per_core: Vec<(u32, f64)> = after
        .cores
        .iter()
        .filter_map(|(id, now)| {
            before
                .cores
                .iter()
                .find(|(prev_id, _)| prev_id == id)
                .map(|(_, prev)| (*id, utilization(*prev, *now)))
        })
        .collect();
    per_core.sort_by_key(|(id, _)| *id);
    CpuSample::new(
        utilization(before.aggregate, after.aggregate),
        per_core.into_iter().map(|(_, usage)| usage),
    )
}

/// Last-seen counters per core index. Owned by one sampler; callers serialize access.
#[derive(Debug, Default)]
pub struct DeltaCache {
    previous: HashMap<usize, CoreTimes>,
}

impl DeltaCache {
    /// Computes usage against the cached baseline, then replaces it with `current`.
    /// A core seen for the first time reports 0. Aggregate usage is the summed per-core delta.
    pub fn advance(&mut self, current: &[CoreTimes]) -> CpuSample {
        let mut total = CoreTimes::default();
        let mut per_core = Vec::with_capacity(current.len());
        for (i, now) in current.iter().enumerate() {
            let prev = self.previous.insert(i, *now).unwrap_or(*now);
            total.total += now.total.saturating_sub(prev.total);
            total.idle += now.idle.saturating_sub(prev.idle);
            per_core.push(utilization(prev, *now));
        }
        CpuSample::new(utilization(CoreTimes::default(), total), per_core)
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(total: u64, idle: u64) -> CoreTimes {
        CoreTimes { total, idle }
    }

    #[test]
    fn zero_total_delta_is_zero_usage() {
        assert_eq!(utilization(t(100, 50), t(100, 50)), 0.0);
    }

    #[test]
    fn usage_within_bounds() {
        assert_eq!(utilization(t(100, 50), t(200, 75)), 75.0);
        assert_eq!(utilization(t(0, 0), t(100, 100)), 0.0);
        assert_eq!(utilization(t(0, 0), t(100, 0)), 100.0);
    }

    #[test]
    fn counter_reset_does_not_underflow() {
        let u = utilization(t(1000, 900), t(10, 5));
        assert_eq!(u, 0.0);
    }

    #[test]
    fn usage_rounds_to_one_decimal() {
        assert_eq!(utilization(t(0, 0), t(3, 2)), 33.3);
    }

    #[test]
    fn first_advance_yields_zero_then_deltas() {
        let mut cache = DeltaCache::default();
        let first = cache.advance(&[t(100, 80), t(100, 20)]);
        assert_eq!(first.usage, 0.0);
        assert_eq!(first.cores, 2);
        assert!(first.core_utilizations.iter().all(|c| c.usage == 0.0));

        let second = cache.advance(&[t(200, 130), t(200, 70)]);
        assert_eq!(second.core_utilizations[0].usage, 50.0);
        assert_eq!(second.core_utilizations[1].usage, 50.0);
        // summed: total 200, idle 100
        assert_eq!(second.usage, 50.0);
    }

    #[test]
    fn aggregate_is_weighted_by_core_deltas() {
        let mut cache = DeltaCache::default();
        cache.advance(&[t(0, 0), t(0, 0)]);
        let s = cache.advance(&[t(100, 0), t(300, 300)]);
        assert_eq!(s.core_utilizations[0].usage, 100.0);
        assert_eq!(s.core_utilizations[1].usage, 0.0);
        assert_eq!(s.usage, 25.0);
    }
}
