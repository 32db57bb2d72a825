use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use mem_consolidation::{AlwaysAdmit, ClaimRegistry, ConsolidationCycleReport, ConsolidationPipeline, TierAdmission};
use mem_core::config::MaintenanceConfig;
use mem_core::errors::EngineResult;
use mem_core::model::{AuditEvent, MetricSample, Tier};
use mem_core::traits::{AuditSink, EmbeddingProvider, MetricsSink, NullSink};
use mem_tier::{LtmTier, MtmTier, StmTier};

use crate::quarantine::QuarantineRegistry;

/// Outcome of one decay cycle across MTM and LTM (STM has no decay
/// pass; its only forgetting path is TTL expiry, swept here too).
#[derive(Debug, Clone, Default)]
pub struct DecayCycleSummary {
    pub touched: usize,
    pub forgotten: usize,
    pub expired: usize,
}

/// Outcome of one quality-sweep cycle.
#[derive(Debug, Clone, Default)]
pub struct QualitySweepSummary {
    pub checked: usize,
    pub repaired: usize,
    pub versions_trimmed: usize,
}

/// Composes the three tiers with a shared claim registry, quarantine
/// list, and sink set, and exposes one async method per recurring task
/// class. Each method runs a single pass; `mem-maintenance::run` (the
/// scheduler loops) decides when to call them.
pub struct MaintenanceOrchestrator {
    stm: Arc<StmTier>,
    mtm: Arc<MtmTier>,
    ltm: Arc<LtmTier>,
    claims: Arc<ClaimRegistry>,
    quarantine: Arc<QuarantineRegistry>,
    admission: Arc<dyn TierAdmission>,
    audit: Arc<dyn AuditSink>,
    metrics: Arc<dyn MetricsSink>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    /// Present only when LTM (or MTM) is actually backed by SQLite;
    /// version-history retention is a SQL-backend-specific concern with
    /// no equivalent on the in-memory/vector/graph backends, so this is
    /// wired in separately from the type-erased tier backends rather
    /// than added to `StorageBackend` for every implementation to stub.
    sql_backend: Option<Arc<mem_storage::SqlBackend>>,
    config: MaintenanceConfig,
}

impl MaintenanceOrchestrator {
    pub fn new(
        stm: Arc<StmTier>,
        mtm: Arc<MtmTier>,
        ltm: Arc<LtmTier>,
        config: MaintenanceConfig,
    ) -> Self {
        Self {
            stm,
            mtm,
            ltm,
            claims: Arc::new(ClaimRegistry::new()),
            quarantine: Arc::new(QuarantineRegistry::new()),
            admission: Arc::new(AlwaysAdmit),
            audit: Arc::new(NullSink),
            metrics: Arc::new(NullSink),
            embedder: None,
            sql_backend: None,
            config,
        }
    }

    pub fn with_admission(mut self, admission: Arc<dyn TierAdmission>) -> Self {
        self.admission = admission;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_sql_backend(mut self, backend: Arc<mem_storage::SqlBackend>) -> Self {
        self.sql_backend = Some(backend);
        self
    }

    pub fn quarantine(&self) -> &QuarantineRegistry {
        &self.quarantine
    }

    /// One decay pass: MTM and LTM each decay in place, STM's expired
    /// records are swept. Tiers apply their own write-backs; this
    /// method's job is orchestration and the audit/metrics emission the
    /// tier layer deliberately does not own.
    pub async fn run_decay_cycle(&self, now: DateTime<Utc>) -> EngineResult<DecayCycleSummary> {
        let mtm_start = Instant::now();
        let mtm_report = self.mtm.decay(now, false).await?;
        self.audit.emit(AuditEvent::DecayCycle {
            tier: Tier::Mtm,
            touched: mtm_report.touched,
            forgotten: mtm_report.forgotten.len(),
            duration_ms: mtm_start.elapsed().as_millis() as u64,
        });

        let ltm_start = Instant::now();
        let ltm_report = self.ltm.decay(now, false).await?;
        self.audit.emit(AuditEvent::DecayCycle {
            tier: Tier::Ltm,
            touched: ltm_report.touched,
            forgotten: ltm_report.forgotten.len(),
            duration_ms: ltm_start.elapsed().as_millis() as u64,
        });

        let expired = self.stm.sweep_expired(now).await?;
        for id in &expired {
            self.audit.emit(AuditEvent::Expired { id: *id });
        }

        let summary = DecayCycleSummary {
            touched: mtm_report.touched + ltm_report.touched,
            forgotten: mtm_report.forgotten.len() + ltm_report.forgotten.len(),
            expired: expired.len(),
        };
        self.metrics.record(MetricSample::gauge("maintenance_decay_touched", summary.touched as f64, vec![]));
        self.metrics.record(MetricSample::gauge("maintenance_decay_forgotten", summary.forgotten as f64, vec![]));
        Ok(summary)
    }

    /// One consolidation pass: STM's promotion-eligible ids move to
    /// MTM, then MTM's move to LTM. Both legs share the same claim
    /// registry so a record cannot be double-claimed across the two
    /// legs in a single cycle, and quarantined ids from either leg feed
    /// the quality sweep.
    pub async fn run_consolidation_cycle(&self) -> ConsolidationCycleReport {
        let pipeline = ConsolidationPipeline::new(
            self.claims.as_ref(),
            self.embedder.as_deref(),
            self.admission.as_ref(),
            self.audit.as_ref(),
            self.config.max_retries,
        );

        let stm_ids = self.stm.eligible_for_promotion();
        let stm_report = pipeline
            .promote_batch(&stm_ids, Tier::Stm, Tier::Mtm, self.stm.backend(), self.mtm.backend())
            .await;
        self.quarantine.mark_all(stm_report.quarantined.iter().copied());

        let mtm_ids = self.mtm.eligible_for_promotion(Utc::now()).await.unwrap_or_default();
        let mtm_report = pipeline
            .promote_batch(&mtm_ids, Tier::Mtm, Tier::Ltm, self.mtm.backend(), self.ltm.backend())
            .await;
        self.quarantine.mark_all(mtm_report.quarantined.iter().copied());

        self.metrics.record(MetricSample::gauge(
            "maintenance_consolidation_promoted",
            (stm_report.promoted + mtm_report.promoted) as f64,
            vec![],
        ));

        ConsolidationCycleReport {
            promoted: stm_report.promoted + mtm_report.promoted,
            errors: stm_report.errors + mtm_report.errors,
            duration: stm_report.duration + mtm_report.duration,
            quarantined: [stm_report.quarantined, mtm_report.quarantined].concat(),
        }
    }

    /// Re-checks every quarantined id and clears it once it is found
    /// resolvable again.
    ///
    /// The original design for this pass also walked LTM looking for
    /// edges whose endpoint no longer resolved, on the theory that a
    /// backend could mirror adjacency into separate per-endpoint lists
    /// that drift out of sync. `GraphBackend::add_edge` rejects an edge
    /// with either endpoint missing, and `delete` cascades into
    /// `remove_all_for`, so a dangling edge cannot arise through this
    /// backend's own API — there is nothing for that check to ever
    /// find, so it was dropped rather than kept as dead code.
    pub async fn run_quality_sweep_cycle(&self, now: DateTime<Utc>) -> EngineResult<QualitySweepSummary> {
        let start = Instant::now();
        let mut checked = 0usize;
        let mut repaired = 0usize;

        for id in self.quarantine.snapshot() {
            checked += 1;
            if self.ltm.backend().read(id).await.is_ok() {
                self.quarantine.clear(id);
                repaired += 1;
            }
        }

        let versions_trimmed = match &self.sql_backend {
            Some(backend) => backend.enforce_version_retention(self.config.max_versions_per_item).await?,
            None => 0,
        };

        self.audit.emit(AuditEvent::QualityCycle {
            tier: Tier::Ltm,
            checked,
            repaired,
            duration_ms: start.elapsed().as_millis() as u64,
        });
        let _ = now;
        Ok(QualitySweepSummary { checked, repaired, versions_trimmed })
    }
}
