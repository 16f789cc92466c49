// Synthesizes monotonically increasing per-core tick counters from sysinfo's usage gauge,
// for hosts without a kernel counter file.

use crate::cpu_sampler::CoreTimes;
use std::time::Instant;

/// Ticks per second, matching the kernel's USER_HZ.
const TICKS_PER_SEC: f64 = 100.0;

#[derive(Debug)]
pub struct TickIntegrator {
    last: Instant,
    cores: Vec<CoreTimes>,
}

impl Default for TickIntegrator {
    fn default() -> Self {
        Self {
            last: Instant::now(),
            cores: Vec::new(),
        }
    }
}

impl TickIntegrator {
    /// Accumulates elapsed ticks split into busy/idle by each core's usage percentage.
    pub fn advance(&mut self, usages: &[f32]) -> Vec<CoreTimes> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f64() * TICKS_PER_SEC;
        self.last = now;
        self.advance_by(elapsed, usages)
    }

    fn advance_by(&mut self, elapsed_ticks: f64, usages: &[f32]) -> Vec<CoreTimes> {
        self.cores.resize(usages.len(), CoreTimes::default());
        let elapsed = elapsed_ticks.max(0.0).round() as u64;
        for (times, usage) in self.cores.iter_mut().zip(usages) {
            let busy_fraction = (*usage as f64 / 100.0).clamp(0.0, 1.0);
            let busy = ((elapsed as f64) * busy_fraction).round() as u64;
            times.total += elapsed;
            times.idle += elapsed.saturating_sub(busy);
        }
        self.cores.clone()
    }
}
