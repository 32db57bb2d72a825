use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mem_consolidation::TierAdmission;
use mem_core::config::WatchdogConfig;
use mem_core::errors::{EngineError, EngineResult};
use mem_core::model::{MetricSample, Tier};
use mem_core::traits::MetricsSink;

/// Tracks per-tier item counts against configured caps and decides
/// admission. `admit` is synchronous (the [`TierAdmission`] boundary it
/// implements is called from inside the consolidation pipeline's hot
/// path), so counts are plain atomics kept current by the caller that
/// actually performs the write or delete — see [`CapacityWatchdog::observe_created`]
/// and [`CapacityWatchdog::observe_removed`] — rather than queried live
/// from a backend.
pub struct CapacityWatchdog {
    stm_count: AtomicUsize,
    mtm_count: AtomicUsize,
    ltm_count: AtomicUsize,
    config: WatchdogConfig,
    metrics: Arc<dyn MetricsSink>,
}

impl CapacityWatchdog {
    pub fn new(config: WatchdogConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            stm_count: AtomicUsize::new(0),
            mtm_count: AtomicUsize::new(0),
            ltm_count: AtomicUsize::new(0),
            config,
            metrics,
        }
    }

    fn counter(&self, tier: Tier) -> &AtomicUsize {
        match tier {
            Tier::Stm => &self.stm_count,
            Tier::Mtm => &self.mtm_count,
            Tier::Ltm => &self.ltm_count,
        }
    }

    fn capacity(&self, tier: Tier) -> Option<usize> {
        match tier {
            Tier::Stm => Some(self.config.stm_capacity),
            Tier::Mtm => Some(self.config.mtm_capacity),
            Tier::Ltm => self.config.ltm_capacity,
        }
    }

    /// Record a successful create in `tier`. Call after the write, not
    /// before — `admit` having returned `Ok` does not guarantee the
    /// caller's write actually lands (a concurrent eviction or backend
    /// error can still intervene).
    pub fn observe_created(&self, tier: Tier) {
        let count = self.counter(tier).fetch_add(1, Ordering::Relaxed) + 1;
        self.publish_utilization(tier, count);
    }

    pub fn observe_removed(&self, tier: Tier) {
        let previous = self.counter(tier).fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
            Some(c.saturating_sub(1))
        });
        let count = previous.map(|c| c.saturating_sub(1)).unwrap_or(0);
        self.publish_utilization(tier, count);
    }

    fn publish_utilization(&self, tier: Tier, count: usize) {
        let utilization = self.capacity(tier).map(|cap| {
            if cap == 0 { 1.0 } else { count as f64 / cap as f64 }
        });
        self.metrics.record(MetricSample::gauge(
            "watchdog_tier_item_count",
            count as f64,
            vec![("tier", tier.to_string())],
        ));
        if let Some(utilization) = utilization {
            self.metrics.record(MetricSample::gauge(
                "watchdog_tier_utilization",
                utilization,
                vec![("tier", tier.to_string())],
            ));
        }
    }
}

impl TierAdmission for CapacityWatchdog {
    /// STM's hard cap is enforced synchronously inside the tier itself
    /// (least-recently-accessed eviction on overflow), so admission into
    /// STM always succeeds here; this call only keeps the utilization
    /// gauge current. MTM and LTM have no such eviction path, so a full
    /// tier rejects with `CapacityExceeded` rather than silently
    /// dropping an existing record.
    fn admit(&self, tier: Tier) -> EngineResult<()> {
        let count = self.counter(tier).load(Ordering::Relaxed);
        match (tier, self.capacity(tier)) {
            (Tier::Stm, _) => Ok(()),
            (_, Some(cap)) if count >= cap => Err(EngineError::CapacityExceeded { tier }),
            _ => Ok(()),
        }
    }
}
