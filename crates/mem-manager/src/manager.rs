use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use mem_core::config::MaintenanceConfig;
use mem_core::errors::{EngineError, EngineResult, StorageError};
use mem_core::model::{
    Content, Direction, MemoryItem, MemoryPatch, Metadata, Relationship, SearchHit, Tier,
    KEY_TENANT_ID, KEY_USER_ID,
};
use mem_core::model::{AuditEvent, MetricSample};
use mem_core::traits::{AuditSink, EmbeddingProvider, MetricsSink, RelationshipStore, VectorSearch};
use mem_consolidation::TierAdmission;
use mem_guard::{AuditTrail, CapacityWatchdog, MetricsPublisher, Sanitizer};
use mem_maintenance::{DecayCycleSummary, MaintenanceOrchestrator, QualitySweepSummary};
use mem_retrieval::{RetrievalEngine, RetrievalQuery, TierSource};
use mem_tier::{LtmTier, MtmTier, StmTier};

/// Caller-facing request to store a new item. Tier is always STM on
/// entry; the consolidation pipeline is the only path that ever moves a
/// record onward from there.
pub struct NewMemory {
    pub text: String,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    pub source: Option<String>,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub tags: Vec<String>,
    pub importance: Option<f64>,
}

impl NewMemory {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            summary: None,
            keywords: Vec::new(),
            source: None,
            tenant_id: None,
            user_id: None,
            tags: Vec::new(),
            importance: None,
        }
    }

    fn into_item(self) -> MemoryItem {
        let mut metadata = Metadata::new();
        if let Some(tenant_id) = self.tenant_id {
            metadata.insert(KEY_TENANT_ID, serde_json::json!(tenant_id));
        }
        if let Some(user_id) = self.user_id {
            metadata.insert(KEY_USER_ID, serde_json::json!(user_id));
        }
        if !self.tags.is_empty() {
            metadata.set_tags(self.tags);
        }
        if let Some(importance) = self.importance {
            metadata.set_importance(importance);
        }
        let mut content = Content::new(self.text);
        content.summary = self.summary;
        content.keywords = self.keywords;
        content.source = self.source;
        MemoryItem::new(content, metadata, Tier::Stm)
    }
}

/// Per-tier unavailability flags. A tier enters degraded mode when its
/// backend reports [`StorageError::Corrupt`] and stays there, serving
/// `Cancelled`-shaped errors instead of touching the backend again,
/// until an operator calls [`MemoryManager::recover`].
#[derive(Default)]
struct DegradedTiers {
    stm: AtomicBool,
    mtm: AtomicBool,
    ltm: AtomicBool,
}

impl DegradedTiers {
    fn flag(&self, tier: Tier) -> &AtomicBool {
        match tier {
            Tier::Stm => &self.stm,
            Tier::Mtm => &self.mtm,
            Tier::Ltm => &self.ltm,
        }
    }

    fn is_degraded(&self, tier: Tier) -> bool {
        self.flag(tier).load(Ordering::Relaxed)
    }

    fn mark(&self, tier: Tier) {
        self.flag(tier).store(true, Ordering::Relaxed);
    }

    fn clear(&self, tier: Tier) {
        self.flag(tier).store(false, Ordering::Relaxed);
    }
}

/// The public façade: owns the three tiers, the cross-cutting guard
/// services, the retrieval engine, and the maintenance orchestrator, and
/// is the only thing a host application talks to. Every mutating
/// operation runs the same pipeline: sanitize, check admission, write,
/// update the watchdog's counters, then emit audit and metrics records.
pub struct MemoryManager {
    stm: Arc<StmTier>,
    mtm: Arc<MtmTier>,
    ltm: Arc<LtmTier>,
    mtm_vector: Option<Arc<dyn VectorSearch>>,
    ltm_vector: Option<Arc<dyn VectorSearch>>,
    sanitizer: Arc<Sanitizer>,
    watchdog: Arc<CapacityWatchdog>,
    audit: Arc<AuditTrail>,
    metrics: Arc<MetricsPublisher>,
    retrieval: RetrievalEngine,
    maintenance: Arc<MaintenanceOrchestrator>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    maintenance_config: MaintenanceConfig,
    degraded: DegradedTiers,
}

impl MemoryManager {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        stm: Arc<StmTier>,
        mtm: Arc<MtmTier>,
        ltm: Arc<LtmTier>,
        mtm_vector: Option<Arc<dyn VectorSearch>>,
        ltm_vector: Option<Arc<dyn VectorSearch>>,
        sanitizer: Arc<Sanitizer>,
        watchdog: Arc<CapacityWatchdog>,
        audit: Arc<AuditTrail>,
        metrics: Arc<MetricsPublisher>,
        retrieval: RetrievalEngine,
        maintenance: Arc<MaintenanceOrchestrator>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        maintenance_config: MaintenanceConfig,
    ) -> Self {
        Self {
            stm,
            mtm,
            ltm,
            mtm_vector,
            ltm_vector,
            sanitizer,
            watchdog,
            audit,
            metrics,
            retrieval,
            maintenance,
            embedder,
            maintenance_config,
            degraded: DegradedTiers::default(),
        }
    }

    /// Lets a caller subscribe to the audit stream directly, e.g. to
    /// pipe it into an external log.
    pub fn subscribe_audit(&self) -> tokio::sync::broadcast::Receiver<mem_core::model::AuditRecord> {
        self.audit.subscribe()
    }

    pub fn metrics(&self) -> &MetricsPublisher {
        &self.metrics
    }

    pub fn is_degraded(&self, tier: Tier) -> bool {
        self.degraded.is_degraded(tier)
    }

    /// Clears a tier's degraded-mode flag, re-enabling ordinary reads
    /// and writes against it. The operator is expected to have already
    /// repaired or replaced the underlying backend; this call performs
    /// no verification of its own.
    pub fn recover(&self, tier: Tier) {
        self.degraded.clear(tier);
        self.metrics.record(MetricSample::gauge("tier_degraded", 0.0, vec![("tier", tier.to_string())]));
    }

    fn mark_degraded(&self, tier: Tier, reason: String) {
        self.degraded.mark(tier);
        self.audit.emit(AuditEvent::DegradedMode { tier, reason: reason.clone() });
        self.metrics.record(MetricSample::gauge("tier_degraded", 1.0, vec![("tier", tier.to_string())]));
        tracing::warn!(tier = %tier, reason, "tier entered degraded mode");
    }

    /// Maps a storage-layer corruption report into degraded-mode state
    /// plus the documented `Cancelled`-shaped caller error; every other
    /// error kind passes through unchanged.
    fn translate_storage_error(&self, tier: Tier, err: EngineError) -> EngineError {
        if let EngineError::Storage(StorageError::Corrupt { message }) = &err {
            self.mark_degraded(tier, message.clone());
            return EngineError::Cancelled;
        }
        err
    }

    fn degraded_guard(&self, tier: Tier) -> EngineResult<()> {
        if self.degraded.is_degraded(tier) {
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }

    /// Embeds `new.text` through the injected provider, if one is
    /// configured, before the sanitizer runs content length/injection
    /// checks on the raw text. A caller with no embedder configured
    /// simply stores the record without a vector.
    pub async fn add_memory(&self, new: NewMemory) -> EngineResult<Uuid> {
        self.degraded_guard(Tier::Stm)?;
        self.watchdog.admit(Tier::Stm)?;

        let mut item = new.into_item();
        item = self.sanitizer.sanitize(item)?;

        if let Some(embedder) = &self.embedder {
            item.embedding = Some(embedder.embed(&item.content.text).await?);
        }

        let id = item.id;
        let tenant = item.metadata.tenant_id().map(str::to_string);
        let user = item.metadata.user_id().map(str::to_string);

        self.stm
            .store(item)
            .await
            .map_err(|e| self.translate_storage_error(Tier::Stm, e))?;
        self.watchdog.observe_created(Tier::Stm);
        self.audit.emit(AuditEvent::Created { id, tier: Tier::Stm, tenant, user });
        self.metrics.record(MetricSample::counter("created", vec![("tier", "stm".into())]));

        Ok(id)
    }

    /// Reads through all three tiers in residency order (STM, then MTM,
    /// then LTM) since a caller has no a priori way to know where a
    /// record currently lives.
    pub async fn get_memory(&self, id: Uuid) -> EngineResult<MemoryItem> {
        let now = Utc::now();

        if !self.degraded.is_degraded(Tier::Stm) {
            match self.stm.retrieve(id, now).await {
                Ok(item) => {
                    self.metrics.record(MetricSample::counter("read", vec![("tier", "stm".into())]));
                    return Ok(item);
                }
                Err(e @ EngineError::Storage(StorageError::Corrupt { .. })) => {
                    self.translate_storage_error(Tier::Stm, e);
                }
                Err(_) => {}
            }
        }

        if !self.degraded.is_degraded(Tier::Mtm) {
            match self.mtm.retrieve(id, now).await {
                Ok(item) => {
                    self.metrics.record(MetricSample::counter("read", vec![("tier", "mtm".into())]));
                    return Ok(item);
                }
                Err(e @ EngineError::Storage(StorageError::Corrupt { .. })) => {
                    self.translate_storage_error(Tier::Mtm, e);
                }
                Err(_) => {}
            }
        }

        if self.degraded.is_degraded(Tier::Ltm) {
            return Err(EngineError::Cancelled);
        }
        match self.ltm.retrieve(id, now).await {
            Ok(item) => {
                self.metrics.record(MetricSample::counter("read", vec![("tier", "ltm".into())]));
                Ok(item)
            }
            Err(e @ EngineError::Storage(StorageError::Corrupt { .. })) => {
                Err(self.translate_storage_error(Tier::Ltm, e))
            }
            Err(e) => Err(e),
        }
    }

    async fn locate(&self, id: Uuid) -> EngineResult<Tier> {
        for tier in [Tier::Stm, Tier::Mtm, Tier::Ltm] {
            if self.degraded.is_degraded(tier) {
                continue;
            }
            let backend = match tier {
                Tier::Stm => self.stm.backend(),
                Tier::Mtm => self.mtm.backend(),
                Tier::Ltm => self.ltm.backend(),
            };
            match backend.read(id).await {
                Ok(_) => return Ok(tier),
                Err(EngineError::Storage(StorageError::Corrupt { message })) => {
                    self.mark_degraded(tier, message);
                }
                Err(_) => {}
            }
        }
        Err(EngineError::NotFound { id: id.to_string() })
    }

    pub async fn update_memory(&self, id: Uuid, base_version: u64, patch: MemoryPatch) -> EngineResult<MemoryItem> {
        let tier = self.locate(id).await?;
        let result = match tier {
            Tier::Stm => self.stm.update(id, base_version, patch).await,
            Tier::Mtm => self.mtm.update(id, base_version, patch).await,
            Tier::Ltm => self.ltm.update(id, base_version, patch).await,
        };
        let updated = result.map_err(|e| self.translate_storage_error(tier, e))?;
        self.audit.emit(AuditEvent::Updated { id, tier, version: updated.version });
        self.metrics.record(MetricSample::counter("updated", vec![("tier", tier.to_string())]));
        Ok(updated)
    }

    pub async fn delete_memory(&self, id: Uuid) -> EngineResult<bool> {
        let tier = self.locate(id).await?;
        let result = match tier {
            Tier::Stm => self.stm.delete(id).await,
            Tier::Mtm => self.mtm.delete(id).await,
            Tier::Ltm => self.ltm.delete(id).await,
        };
        let deleted = result.map_err(|e| self.translate_storage_error(tier, e))?;
        if deleted {
            self.watchdog.observe_removed(tier);
            self.audit.emit(AuditEvent::Deleted { id, tier, reason: "caller requested deletion".into() });
            self.metrics.record(MetricSample::counter("deleted", vec![("tier", tier.to_string())]));
        }
        Ok(deleted)
    }

    pub async fn search_memories(&self, query: RetrievalQuery) -> EngineResult<Vec<SearchHit>> {
        let now = Utc::now();
        let mut sources = Vec::with_capacity(3);
        if !self.degraded.is_degraded(Tier::Stm) {
            sources.push(TierSource { tier: Tier::Stm, backend: self.stm.backend(), vector: None });
        }
        if !self.degraded.is_degraded(Tier::Mtm) {
            sources.push(TierSource { tier: Tier::Mtm, backend: self.mtm.backend(), vector: self.mtm_vector.as_deref() });
        }
        if !self.degraded.is_degraded(Tier::Ltm) {
            sources.push(TierSource { tier: Tier::Ltm, backend: self.ltm.backend(), vector: self.ltm_vector.as_deref() });
        }
        let hits = self.retrieval.search(&sources, &query, now).await?;
        self.metrics.record(MetricSample::counter("search_requests", vec![]));
        self.metrics
            .record(MetricSample::gauge("search_result_count", hits.len() as f64, vec![]));
        Ok(hits)
    }

    /// Relationships are an LTM-only concept; a record still resident in
    /// STM/MTM has no edges yet.
    pub async fn add_relationship(&self, rel: Relationship) -> EngineResult<()> {
        self.ltm.add_relationship(rel).await
    }

    pub async fn remove_relationship(&self, from: Uuid, to: Uuid) -> EngineResult<bool> {
        self.ltm.remove_relationship(from, to).await
    }

    pub async fn list_relationships(
        &self,
        id: Uuid,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> EngineResult<Vec<Relationship>> {
        self.ltm.list_relationships(id, direction, rel_type).await
    }

    pub fn relationship_store(&self) -> Option<&dyn RelationshipStore> {
        self.ltm.relationships()
    }

    /// Runs one full maintenance pass: decay, then consolidation, then
    /// the quality sweep. Exposed for hosts that drive their own
    /// scheduling instead of running `mem-maintenance`'s background loop.
    pub async fn maintenance_now(&self) -> EngineResult<(DecayCycleSummary, usize, QualitySweepSummary)> {
        let now = Utc::now();
        let decay = self.maintenance.run_decay_cycle(now).await?;
        let consolidation = self.maintenance.run_consolidation_cycle().await;
        let quality = self.maintenance.run_quality_sweep_cycle(now).await?;
        Ok((decay, consolidation.promoted, quality))
    }

    pub fn maintenance_config(&self) -> &MaintenanceConfig {
        &self.maintenance_config
    }
}
