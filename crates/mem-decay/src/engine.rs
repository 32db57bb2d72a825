use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mem_core::config::DecayParams;
use mem_core::model::MemoryItem;

use crate::equations::decay_item;

/// Parameters for one batch decay pass: the frozen clock reading (so a
/// pass is deterministic for a given set of inputs), the tier-specific
/// equation parameters, and whether this is the manual (explicit,
/// caller-triggered) decay path rather than the periodic one.
pub struct DecayContext {
    pub now: DateTime<Utc>,
    pub params: DecayParams,
    pub manual: bool,
}

impl Default for DecayContext {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            params: DecayParams::default(),
            manual: false,
        }
    }
}

/// Outcome of one `process_batch` call: how many items were touched and
/// which ones crossed their forgetting threshold and should be removed
/// by the caller (the decay engine never deletes — it operates on
/// records already pulled into memory by the tier/maintenance layer).
#[derive(Debug, Clone)]
pub struct DecayBatchReport {
    pub touched: usize,
    pub forgotten: Vec<Uuid>,
    pub duration: Duration,
}

#[derive(Default)]
pub struct DecayEngine;

impl DecayEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn process_batch(&self, items: &mut [MemoryItem], ctx: &DecayContext) -> DecayBatchReport {
        let start = Instant::now();
        let mut forgotten = Vec::new();
        for item in items.iter_mut() {
            if decay_item(item, &ctx.params, ctx.now, ctx.manual) {
                forgotten.push(item.id);
            }
        }
        let report = DecayBatchReport {
            touched: items.len(),
            forgotten,
            duration: start.elapsed(),
        };
        tracing::debug!(touched = report.touched, forgotten = report.forgotten.len(), "decay batch processed");
        report
    }
}
