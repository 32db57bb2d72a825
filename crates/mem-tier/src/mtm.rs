use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mem_core::config::MtmConfig;
use mem_core::errors::EngineResult;
use mem_core::model::{MemoryItem, MemoryPatch, SearchFilter, SearchHit, Tier};
use mem_core::traits::StorageBackend;
use mem_decay::{DecayBatchReport, DecayContext, DecayEngine};

/// MTM policy wrapper: no TTL, capacity limit enforced by the backend
/// (`StorageError::CapacityExceeded` surfaces to the caller), passive
/// decay, and promotion eligibility gated on strength plus a minimum
/// residency since creation.
pub struct MtmTier {
    backend: Arc<dyn StorageBackend>,
    config: MtmConfig,
}

impl MtmTier {
    pub fn new(backend: Arc<dyn StorageBackend>, config: MtmConfig) -> Self {
        Self { backend, config }
    }

    pub async fn store(&self, mut item: MemoryItem) -> EngineResult<()> {
        item.tier = Tier::Mtm;
        self.backend.create(item).await
    }

    pub async fn retrieve(&self, id: Uuid, now: DateTime<Utc>) -> EngineResult<MemoryItem> {
        let item = self.backend.read(id).await?;
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

    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Applies one decay pass over every resident record, persists the
    /// new strength/reinforcement state, and deletes any record that
    /// crossed its forgetting threshold. Records that changed
    /// concurrently (a version conflict on write-back) are skipped this
    /// cycle rather than failing the whole pass; they are picked up
    /// again next cycle.
    pub async fn decay(&self, now: DateTime<Utc>, manual: bool) -> EngineResult<DecayBatchReport> {
        let hits = self.backend.search(&SearchFilter::default()).await?;
        let mut items: Vec<MemoryItem> = hits.into_iter().map(|h| h.item).collect();

        let engine = DecayEngine::new();
        let ctx = DecayContext { now, params: self.config.decay, manual };
        let report = engine.process_batch(&mut items, &ctx);

        for item in &items {
            let patch = MemoryPatch {
                strength: Some(item.strength),
                reinforcement_level: Some(item.reinforcement_level),
                last_decayed_at: Some(item.last_decayed_at),
                ..Default::default()
            };
            if let Err(e) = self.backend.update(item.id, item.version, patch).await {
                tracing::debug!(id = %item.id, error = %e, "decay write-back skipped, record changed concurrently");
            }
        }
        for id in &report.forgotten {
            self.backend.delete(*id).await?;
        }
        Ok(report)
    }

    /// Ids whose strength has reached `ltm_promote_threshold` and have
    /// survived at least `ltm_min_residency_secs` since creation.
    pub async fn eligible_for_promotion(&self, now: DateTime<Utc>) -> EngineResult<Vec<Uuid>> {
        let hits = self.backend.search(&SearchFilter::default()).await?;
        Ok(hits
            .into_iter()
            .filter(|hit| {
                hit.item.strength >= self.config.ltm_promote_threshold
                    && (now - hit.item.created_at).num_seconds() >= self.config.ltm_min_residency_secs
            })
            .map(|hit| hit.id)
            .collect())
    }

    /// Accepts a record promoted from STM.
    pub async fn ingest_promoted(&self, mut item: MemoryItem) -> EngineResult<()> {
        item.tier = Tier::Mtm;
        self.backend.create(item).await
    }
}
