use async_trait::async_trait;
use moka::sync::Cache;

use mem_core::errors::EngineResult;
use mem_core::traits::EmbeddingProvider;

use crate::cache::ContentHash;

/// Wraps an injected [`EmbeddingProvider`] with a bounded content-hash
/// keyed LRU, so repeated ingestion of identical content or repeated
/// promotion-time re-embedding never re-invokes the inner provider.
/// `embed_batch` inherits caching for free since it is implemented in
/// terms of `embed` at the trait level.
pub struct CachingProvider<P> {
    inner: P,
    cache: Cache<ContentHash, Vec<f32>>,
}

impl<P: EmbeddingProvider> CachingProvider<P> {
    pub fn new(inner: P, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn cache_len(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachingProvider<P> {
    async fn embed(&self, text: &str) -> EngineResult<Vec<f32>> {
        let key = ContentHash::of(text);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(provider = self.inner.name(), "embedding cache hit");
            return Ok(cached);
        }
        let embedding = self.inner.embed(text).await?;
        self.cache.insert(key, embedding.clone());
        tracing::debug!(provider = self.inner.name(), "embedding cache miss");
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
