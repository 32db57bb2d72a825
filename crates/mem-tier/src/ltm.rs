use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mem_core::config::LtmConfig;
use mem_core::errors::EngineResult;
use mem_core::model::{Direction, MemoryItem, MemoryPatch, Relationship, SearchFilter, SearchHit, Tier};
use mem_core::traits::{RelationshipStore, StorageBackend};
use mem_decay::{DecayBatchReport, DecayContext, DecayEngine};

/// LTM policy wrapper: no capacity cap at this layer, longest-half-life
/// decay, and an optional relationship store for knowledge-graph edges.
/// LTM is terminal — nothing promotes out of it; records leave only by
/// explicit delete (edge cascade is the backend's responsibility, see
/// `mem-graph::GraphBackend::delete`).
pub struct LtmTier {
    backend: Arc<dyn StorageBackend>,
    relationships: Option<Arc<dyn RelationshipStore>>,
    config: LtmConfig,
}

impl LtmTier {
    pub fn new(backend: Arc<dyn StorageBackend>, relationships: Option<Arc<dyn RelationshipStore>>, config: LtmConfig) -> Self {
        Self { backend, relationships, config }
    }

    pub async fn store(&self, mut item: MemoryItem) -> EngineResult<()> {
        item.tier = Tier::Ltm;
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

    /// Accepts a record promoted from MTM.
    pub async fn ingest_promoted(&self, mut item: MemoryItem) -> EngineResult<()> {
        item.tier = Tier::Ltm;
        self.backend.create(item).await
    }

    pub async fn add_relationship(&self, rel: Relationship) -> EngineResult<()> {
        match &self.relationships {
            Some(store) => store.add_edge(rel).await,
            None => Ok(()),
        }
    }

    pub async fn remove_relationship(&self, from: Uuid, to: Uuid) -> EngineResult<bool> {
        match &self.relationships {
            Some(store) => store.remove_edge(from, to).await,
            None => Ok(false),
        }
    }

    pub async fn list_relationships(&self, id: Uuid, direction: Direction, rel_type: Option<&str>) -> EngineResult<Vec<Relationship>> {
        match &self.relationships {
            Some(store) => store.get_edges(id, direction, rel_type).await,
            None => Ok(Vec::new()),
        }
    }

    pub fn has_relationship_store(&self) -> bool {
        self.relationships.is_some()
    }

    pub fn relationships(&self) -> Option<&dyn RelationshipStore> {
        self.relationships.as_deref()
    }
}
