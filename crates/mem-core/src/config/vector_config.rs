use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cosine,
    L2,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexFamily {
    Flat,
    Hnsw,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HnswParams {
    pub m: usize,
    pub ef_construction: usize,
    pub ef_search: usize,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 64,
        }
    }
}

/// Vector backend configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub dimension: usize,
    pub metric: Metric,
    pub index: IndexFamily,
    pub hnsw: HnswParams,
    pub normalize: bool,
    /// Number of inserts before the ANN index is (re)built; queries before
    /// the threshold fall back to a flat scan.
    pub warm_up_threshold: usize,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            dimension: 1536,
            metric: Metric::Cosine,
            index: IndexFamily::Hnsw,
            hnsw: HnswParams::default(),
            normalize: true,
            warm_up_threshold: 256,
        }
    }
}
