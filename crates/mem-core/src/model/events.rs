use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tier;

/// Every audit event carries a monotonic per-process sequence number,
/// assigned at the point of emission in `mem-guard::audit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: AuditEvent,
}

/// The full event taxonomy the engine emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AuditEvent {
    Created {
        id: Uuid,
        tier: Tier,
        tenant: Option<String>,
        user: Option<String>,
    },
    Updated {
        id: Uuid,
        tier: Tier,
        version: u64,
    },
    Deleted {
        id: Uuid,
        tier: Tier,
        reason: String,
    },
    Promoted {
        id: Uuid,
        from: Tier,
        to: Tier,
        summary_present: bool,
        embedding_present: bool,
    },
    Forgotten {
        id: Uuid,
        tier: Tier,
    },
    Expired {
        id: Uuid,
    },
    DecayCycle {
        tier: Tier,
        touched: usize,
        forgotten: usize,
        duration_ms: u64,
    },
    ConsolidationCycle {
        from: Tier,
        to: Tier,
        promoted: usize,
        duration_ms: u64,
        errors: usize,
    },
    QualityCycle {
        tier: Tier,
        checked: usize,
        repaired: usize,
        duration_ms: u64,
    },
    PromotionInconsistent {
        id: Uuid,
    },
    DegradedMode {
        tier: Tier,
        reason: String,
    },
}

/// A single metrics observation, shaped for an injected metrics sink:
/// name, labels, value, and timestamp.
#[derive(Debug, Clone)]
pub struct MetricSample {
    pub name: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
    pub at: DateTime<Utc>,
}

impl MetricSample {
    pub fn counter(name: &'static str, labels: Vec<(&'static str, String)>) -> Self {
        Self {
            name,
            labels,
            value: 1.0,
            at: Utc::now(),
        }
    }

    pub fn gauge(name: &'static str, value: f64, labels: Vec<(&'static str, String)>) -> Self {
        Self {
            name,
            labels,
            value,
            at: Utc::now(),
        }
    }
}
