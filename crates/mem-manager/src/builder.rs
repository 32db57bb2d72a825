use std::sync::Arc;

use mem_core::config::EngineConfig;
use mem_core::traits::{EmbeddingProvider, StorageBackend, VectorSearch};
use mem_storage::InMemoryBackend;
use mem_tier::{LtmTier, MtmTier, StmTier};

use mem_guard::{AuditTrail, CapacityWatchdog, MetricsPublisher, Sanitizer};
use mem_maintenance::MaintenanceOrchestrator;
use mem_retrieval::RetrievalEngine;

use crate::manager::MemoryManager;

/// Assembles a [`MemoryManager`] from concrete backend instances and
/// configuration. Defaults every tier to an in-memory backend with no
/// vector or relationship extension and no embedder, matching
/// `MaintenanceOrchestrator::new`'s own all-defaults-then-`with_*`
/// construction style; callers needing SQLite, the vector backend, or
/// the knowledge-graph backend swap in their own `Arc<dyn StorageBackend>`
/// via the `with_*` methods before `build`.
pub struct MemoryManagerBuilder {
    stm_backend: Arc<InMemoryBackend>,
    mtm_backend: Arc<dyn StorageBackend>,
    ltm_backend: Arc<dyn StorageBackend>,
    mtm_vector: Option<Arc<dyn VectorSearch>>,
    ltm_vector: Option<Arc<dyn VectorSearch>>,
    ltm_relationships: Option<Arc<dyn mem_core::traits::RelationshipStore>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    sql_backend: Option<Arc<mem_storage::SqlBackend>>,
    config: EngineConfig,
}

impl MemoryManagerBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            stm_backend: Arc::new(InMemoryBackend::new()),
            mtm_backend: Arc::new(InMemoryBackend::new()),
            ltm_backend: Arc::new(InMemoryBackend::new()),
            mtm_vector: None,
            ltm_vector: None,
            ltm_relationships: None,
            embedder: None,
            sql_backend: None,
            config,
        }
    }

    pub fn with_mtm_backend(mut self, backend: Arc<dyn StorageBackend>) -> Self {
        self.mtm_backend = backend;
        self
    }

    pub fn with_ltm_backend(mut self, backend: Arc<dyn StorageBackend>) -> Self {
        self.ltm_backend = backend;
        self
    }

    pub fn with_mtm_vector(mut self, vector: Arc<dyn VectorSearch>) -> Self {
        self.mtm_vector = Some(vector);
        self
    }

    pub fn with_ltm_vector(mut self, vector: Arc<dyn VectorSearch>) -> Self {
        self.ltm_vector = Some(vector);
        self
    }

    pub fn with_ltm_relationships(mut self, store: Arc<dyn mem_core::traits::RelationshipStore>) -> Self {
        self.ltm_relationships = Some(store);
        self
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Wraps `inner` in a content-addressed cache before injecting it, so
    /// repeated ingestion of identical content never re-invokes the
    /// provider. Equivalent to
    /// `with_embedder(Arc::new(CachingProvider::new(inner, capacity)))`,
    /// provided here so the common case doesn't require the caller to
    /// depend on `mem-embeddings` directly.
    pub fn with_cached_embedder<P>(self, inner: P, capacity: u64) -> Self
    where
        P: EmbeddingProvider + 'static,
    {
        self.with_embedder(Arc::new(mem_embeddings::CachingProvider::new(inner, capacity)))
    }

    pub fn with_sql_backend(mut self, backend: Arc<mem_storage::SqlBackend>) -> Self {
        self.sql_backend = Some(backend);
        self
    }

    pub fn build(self) -> MemoryManager {
        let stm = Arc::new(StmTier::new(self.stm_backend, self.config.stm));
        let mtm = Arc::new(MtmTier::new(self.mtm_backend, self.config.mtm));
        let ltm = Arc::new(LtmTier::new(self.ltm_backend, self.ltm_relationships, self.config.ltm));

        let metrics = Arc::new(MetricsPublisher::new());
        let audit = Arc::new(AuditTrail::new(1024, metrics.clone()));
        let watchdog = Arc::new(CapacityWatchdog::new(self.config.watchdog, metrics.clone()));
        let sanitizer = Arc::new(
            Sanitizer::new(self.config.sanitizer.clone())
                .expect("configured sanitizer secret patterns must be valid regexes"),
        );

        let mut maintenance = MaintenanceOrchestrator::new(stm.clone(), mtm.clone(), ltm.clone(), self.config.maintenance)
            .with_admission(watchdog.clone())
            .with_audit(audit.clone())
            .with_metrics(metrics.clone());
        if let Some(embedder) = self.embedder.clone() {
            maintenance = maintenance.with_embedder(embedder);
        }
        if let Some(sql_backend) = self.sql_backend {
            maintenance = maintenance.with_sql_backend(sql_backend);
        }

        MemoryManager::new(
            stm,
            mtm,
            ltm,
            self.mtm_vector,
            self.ltm_vector,
            sanitizer,
            watchdog,
            audit,
            metrics,
            RetrievalEngine::new(self.config.search),
            Arc::new(maintenance),
            self.embedder,
            self.config.maintenance,
        )
    }
}
