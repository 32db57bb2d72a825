use serde::{Deserialize, Serialize};

/// Capacity thresholds the watchdog admits against. Mirrors
/// [`crate::config::StmConfig::capacity`] and
/// [`crate::config::MtmConfig::capacity`] rather than deriving from them
/// directly, since the watchdog's counters are independent of whichever
/// tier wrapper happens to be wired in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    pub stm_capacity: usize,
    pub mtm_capacity: usize,
    /// `None` means LTM has no tier-level hard cap (the backend's own
    /// storage limits still apply; see [`crate::config::LtmConfig`]).
    pub ltm_capacity: Option<usize>,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            stm_capacity: 10_000,
            mtm_capacity: 50_000,
            ltm_capacity: None,
        }
    }
}
