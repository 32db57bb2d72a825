use serde::{Deserialize, Serialize};

/// Embedding helper configuration, including the content-addressed
/// embedding cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dimension: usize,
    pub cache_capacity: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 1536,
            cache_capacity: 10_000,
        }
    }
}
