pub mod decay_config;
pub mod embedding_config;
pub mod maintenance_config;
pub mod sanitizer_config;
pub mod search_config;
pub mod tier_config;
pub mod vector_config;
pub mod watchdog_config;

use serde::{Deserialize, Serialize};

pub use decay_config::DecayParams;
pub use embedding_config::EmbeddingConfig;
pub use maintenance_config::{MaintenanceConfig, TaskSchedule};
pub use sanitizer_config::SanitizerConfig;
pub use search_config::{ScoreWeights, SearchConfig};
pub use tier_config::{LtmConfig, MtmConfig, StmConfig};
pub use vector_config::{HnswParams, IndexFamily, Metric, VectorConfig};
pub use watchdog_config::WatchdogConfig;

/// Top-level configuration aggregating all subsystem configs. Missing
/// fields in a partially-specified TOML document fall back to the
/// per-field defaults above.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stm: StmConfig,
    pub mtm: MtmConfig,
    pub ltm: LtmConfig,
    pub vector: VectorConfig,
    pub search: SearchConfig,
    pub maintenance: MaintenanceConfig,
    pub sanitizer: SanitizerConfig,
    pub embedding: EmbeddingConfig,
    pub watchdog: WatchdogConfig,
}

impl EngineConfig {
    /// Load config from a TOML string, falling back to defaults for
    /// missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
