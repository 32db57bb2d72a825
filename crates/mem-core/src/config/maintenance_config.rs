use serde::{Deserialize, Serialize};

/// Schedule for one recurring maintenance task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSchedule {
    pub period_secs: u64,
    pub budget_secs: u64,
    /// Jitter bound as a fraction, e.g. `0.2` for +/-20%.
    pub jitter_fraction: f64,
    pub backoff_factor: f64,
    pub max_delay_secs: u64,
    pub batch_size: usize,
}

impl Default for TaskSchedule {
    fn default() -> Self {
        Self {
            period_secs: 60,
            budget_secs: 30,
            jitter_fraction: 0.2,
            backoff_factor: 1.5,
            max_delay_secs: 900,
            batch_size: 32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub decay: TaskSchedule,
    pub consolidate: TaskSchedule,
    pub quality_sweep: TaskSchedule,
    pub max_retries: u32,
    pub shutdown_grace_secs: u64,
    /// Version-history rows kept per memory before the quality sweep
    /// trims the rest (SQL backend only; other backends ignore this).
    pub max_versions_per_item: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            decay: TaskSchedule {
                period_secs: 60,
                ..TaskSchedule::default()
            },
            consolidate: TaskSchedule {
                period_secs: 120,
                ..TaskSchedule::default()
            },
            quality_sweep: TaskSchedule {
                period_secs: 600,
                ..TaskSchedule::default()
            },
            max_retries: 3,
            shutdown_grace_secs: 10,
            max_versions_per_item: 50,
        }
    }
}
