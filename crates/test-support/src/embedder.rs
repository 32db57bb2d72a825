use async_trait::async_trait;

use mem_core::errors::EngineResult;
use mem_core::traits::EmbeddingProvider;

/// Deterministic embedder for tests: a shared baseline plus a
/// text-specific perturbation derived from a simple rolling hash of the
/// input bytes. Two calls on the same text always produce the same
/// vector, and unrelated texts land close enough together that cosine
/// similarity stays well-behaved without pulling in a real model,
/// grounded in the reference workspace's `GoldenEmbedder` fixture.
pub struct DeterministicEmbedder {
    dimensions: usize,
}

impl DeterministicEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }
}

impl Default for DeterministicEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

pub fn deterministic_embedding(text: &str, dims: usize) -> Vec<f32> {
    let hash = text.as_bytes().iter().fold(0u64, |acc, &b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let mut vec = vec![0.5f32; dims];
    for (i, v) in vec.iter_mut().enumerate() {
        let noise = ((hash.wrapping_add(i as u64) % 1000) as f32) / 100_000.0;
        *v += noise;
    }
    vec
}

#[async_trait]
impl EmbeddingProvider for DeterministicEmbedder {
    async fn embed(&self, text: &str) -> EngineResult<Vec<f32>> {
        Ok(deterministic_embedding(text, self.dimensions))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "deterministic-test-embedder"
    }
}
