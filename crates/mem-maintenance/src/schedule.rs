use std::time::Duration;

use mem_core::config::TaskSchedule;

use crate::jitter::jittered;

/// Drives one recurring task's delay between cycles. A cycle that
/// overran its budget or returned an error backs the delay off toward
/// `max_delay_secs`; a clean cycle steps it back toward the configured
/// period. The jitter is re-drawn on every call to `next_delay` so two
/// orchestrators started at the same instant do not stay in lockstep.
pub struct AdaptiveSchedule {
    base: Duration,
    max: Duration,
    current: Duration,
    backoff_factor: f64,
    jitter_fraction: f64,
}

impl AdaptiveSchedule {
    pub fn new(schedule: &TaskSchedule) -> Self {
        let base = Duration::from_secs(schedule.period_secs.max(1));
        let max = Duration::from_secs(schedule.max_delay_secs.max(schedule.period_secs).max(1));
        Self {
            base,
            max,
            current: base,
            backoff_factor: schedule.backoff_factor.max(1.0),
            jitter_fraction: schedule.jitter_fraction,
        }
    }

    /// Call once per completed cycle. `healthy` is false when the cycle
    /// errored or ran past its budget.
    pub fn record_outcome(&mut self, healthy: bool) {
        if healthy {
            if self.current > self.base {
                let step = self.base / 4;
                self.current = self.current.saturating_sub(step).max(self.base);
            }
        } else {
            self.current = self.current.mul_f64(self.backoff_factor).min(self.max);
        }
    }

    pub fn next_delay(&self) -> Duration {
        jittered(self.current, self.jitter_fraction)
    }
}
