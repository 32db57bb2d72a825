use async_trait::async_trait;

use crate::errors::EngineResult;
use crate::model::{SearchFilter, SearchHit};

/// Extension implemented by backends whose [`crate::capability::Capabilities::vector_search`]
/// is set.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Up to `k` records maximizing similarity to `query` and satisfying
    /// `filter`'s predicates. `k == 0` returns empty; `k` larger than the
    /// tier's size returns all eligible records.
    async fn vector_search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
        k: usize,
    ) -> EngineResult<Vec<SearchHit>>;
}
