use serde::{Deserialize, Serialize};

use super::decay_config::DecayParams;

/// STM-specific policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StmConfig {
    pub ttl_seconds: u64,
    pub capacity: usize,
    pub promote_access_threshold: u64,
    pub promote_importance_threshold: f64,
    pub promote_reinforcement_threshold: f64,
}

impl Default for StmConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            capacity: 10_000,
            promote_access_threshold: 3,
            promote_importance_threshold: 0.9,
            promote_reinforcement_threshold: 0.6,
        }
    }
}

/// MTM-specific policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MtmConfig {
    pub capacity: usize,
    pub ltm_promote_threshold: f64,
    pub ltm_min_residency_secs: i64,
    pub decay: DecayParams,
}

impl Default for MtmConfig {
    fn default() -> Self {
        Self {
            capacity: 50_000,
            ltm_promote_threshold: 0.75,
            ltm_min_residency_secs: 24 * 3600,
            decay: DecayParams::mtm_default(),
        }
    }
}

/// LTM-specific policy. No capacity cap at the tier layer
/// (operator quotas are enforced by the backend, see
/// `StorageError::CapacityExceeded`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LtmConfig {
    pub decay: DecayParams,
}

impl Default for LtmConfig {
    fn default() -> Self {
        Self {
            decay: DecayParams::ltm_default(),
        }
    }
}
