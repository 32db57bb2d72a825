use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mem_core::config::StmConfig;
use mem_core::errors::{EngineError, EngineResult};
use mem_core::model::{MemoryItem, MemoryPatch, SearchFilter, SearchHit, Tier};
use mem_core::traits::StorageBackend;
use mem_storage::InMemoryBackend;

/// STM policy wrapper: per-item TTL checked on every read, hard
/// item-count cap with least-recently-accessed eviction on overflow, no
/// decay passes (TTL expiry is STM's only forgetting path).
pub struct StmTier {
    backend: Arc<InMemoryBackend>,
    config: StmConfig,
}

impl StmTier {
    pub fn new(backend: Arc<InMemoryBackend>, config: StmConfig) -> Self {
        Self { backend, config }
    }

    fn is_expired(&self, item: &MemoryItem, now: DateTime<Utc>) -> bool {
        let age_secs = (now - item.created_at).num_seconds().max(0) as u64;
        age_secs >= self.config.ttl_seconds
    }

    /// Evicts the least-recently-accessed record if at capacity, then
    /// creates `item`.
    pub async fn store(&self, mut item: MemoryItem) -> EngineResult<()> {
        if self.backend.len() >= self.config.capacity {
            if let Some(victim) = self.backend.least_recently_accessed() {
                self.backend.delete(victim).await?;
            }
        }
        item.tier = Tier::Stm;
        self.backend.create(item).await
    }

    /// A read of an expired record reports `NotFound` and removes the
    /// record; a live read bumps `last_accessed_at`.
    pub async fn retrieve(&self, id: Uuid, now: DateTime<Utc>) -> EngineResult<MemoryItem> {
        let mut item = self.backend.read(id).await?;
        if self.is_expired(&item, now) {
            let _ = self.backend.delete(id).await;
            return Err(EngineError::NotFound { id: id.to_string() });
        }
        item.mark_accessed(now);
        let patch = MemoryPatch {
            last_accessed_at: Some(now),
            ..Default::default()
        };
        self.backend.update(id, item.version, patch).await
    }

    pub async fn update(&self, id: Uuid, base_version: u64, patch: MemoryPatch) -> EngineResult<MemoryItem> {
        self.backend.update(id, base_version, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> EngineResult<bool> {
        self.backend.delete(id).await
    }

    pub async fn search(&self, filter: &SearchFilter) -> EngineResult<Vec<SearchHit>> {
        self.backend.search(filter).await
    }

    /// The underlying backend, for callers that need the trait-object
    /// surface directly (the consolidation pipeline's source/target
    /// parameters).
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Sweeps every record and removes those whose TTL has elapsed,
    /// returning the removed ids. Run by the maintenance orchestrator
    /// between reads so expiry is not solely dependent on access
    /// patterns.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> EngineResult<Vec<Uuid>> {
        let mut expired = Vec::new();
        for item in self.backend.all() {
            if self.is_expired(&item, now) {
                self.backend.delete(item.id).await?;
                expired.push(item.id);
            }
        }
        Ok(expired)
    }

    fn is_promotion_eligible(&self, item: &MemoryItem) -> bool {
        item.reinforcement_count >= self.config.promote_access_threshold
            || item.importance >= self.config.promote_importance_threshold
            || item.reinforcement_level >= self.config.promote_reinforcement_threshold
    }

    /// Ids eligible for consolidation to MTM: access count, importance,
    /// or reinforcement has crossed its configured threshold.
    pub fn eligible_for_promotion(&self) -> Vec<Uuid> {
        self.backend
            .all()
            .into_iter()
            .filter(|item| self.is_promotion_eligible(item))
            .map(|item| item.id)
            .collect()
    }
}
