use std::time::{Duration as StdDuration, Instant};

use chrono::Utc;
use uuid::Uuid;

use mem_core::errors::{ConsolidationError, EngineError, EngineResult, StorageError};
use mem_core::model::{AuditEvent, MemoryItem, Tier};
use mem_core::traits::{AuditSink, EmbeddingProvider, StorageBackend};

use crate::admission::TierAdmission;
use crate::claim::ClaimRegistry;
use crate::ordering;
use crate::transform;

pub struct PromotionCandidate {
    pub id: Uuid,
    pub from: Tier,
    pub to: Tier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    Promoted,
    AlreadyClaimed,
    SourceMissing,
}

#[derive(Debug, Clone, Default)]
pub struct ConsolidationCycleReport {
    pub promoted: usize,
    pub errors: usize,
    pub duration: StdDuration,
    /// Ids whose compensating rollback itself failed this cycle. These
    /// are left with a record on both tiers or neither and need a
    /// quality sweep to reconcile; see `AuditEvent::PromotionInconsistent`.
    pub quarantined: Vec<Uuid>,
}

fn retry_delay(attempt: u32) -> StdDuration {
    let ms = 50u64.saturating_mul(1u64 << attempt.min(10));
    StdDuration::from_millis(ms.min(2_000))
}

pub struct ConsolidationPipeline<'a> {
    claims: &'a ClaimRegistry,
    embedder: Option<&'a dyn EmbeddingProvider>,
    admission: &'a dyn TierAdmission,
    audit: &'a dyn AuditSink,
    max_retries: u32,
}

impl<'a> ConsolidationPipeline<'a> {
    pub fn new(
        claims: &'a ClaimRegistry,
        embedder: Option<&'a dyn EmbeddingProvider>,
        admission: &'a dyn TierAdmission,
        audit: &'a dyn AuditSink,
        max_retries: u32,
    ) -> Self {
        Self {
            claims,
            embedder,
            admission,
            audit,
            max_retries,
        }
    }

    /// Runs the staged transactional promotion for one candidate.
    /// Returns `Ok(AlreadyClaimed)`/`Ok(SourceMissing)` for the
    /// non-error skip paths; any other failure surfaces as `Err`, with
    /// a failed compensating rollback additionally emitting
    /// `PromotionInconsistent` before returning
    /// `ConsolidationError::RollbackFailed`.
    pub async fn promote_one(
        &self,
        candidate: PromotionCandidate,
        source: &dyn StorageBackend,
        target: &dyn StorageBackend,
    ) -> EngineResult<PromotionOutcome> {
        let _guard = match self.claims.try_claim(candidate.id, candidate.from) {
            Some(guard) => guard,
            None => return Ok(PromotionOutcome::AlreadyClaimed),
        };

        let mut item = match source.read(candidate.id).await {
            Ok(item) => item,
            Err(EngineError::NotFound { .. }) => return Ok(PromotionOutcome::SourceMissing),
            Err(e) => return Err(e),
        };

        if candidate.to == Tier::Ltm {
            item.content.summary = Some(transform::summarize(&item.content.text, 2));
            item.content.keywords = transform::keywords(&item.content.text, item.importance, 5);
            if item.embedding.is_none() {
                if let Some(embedder) = self.embedder {
                    item.embedding = Some(embedder.embed(&item.content.text).await?);
                }
            }
        }

        self.admission.admit(candidate.to)?;

        item.tier = candidate.to;
        let summary_present = item.content.summary.is_some();
        let embedding_present = item.embedding.is_some();

        let mut attempt = 0u32;
        loop {
            match target.create(item.clone()).await {
                Ok(()) | Err(EngineError::AlreadyExists { .. }) => break,
                Err(EngineError::Storage(StorageError::Transient { .. })) if attempt < self.max_retries => {
                    attempt += 1;
                    tokio::time::sleep(retry_delay(attempt)).await;
                }
                Err(e) => return Err(e),
            }
        }

        if let Err(delete_err) = source.delete(candidate.id).await {
            return match target.delete(candidate.id).await {
                Ok(_) => Err(delete_err),
                Err(rollback_err) => {
                    self.audit.emit(AuditEvent::PromotionInconsistent { id: candidate.id });
                    tracing::error!(id = %candidate.id, %rollback_err, "compensating rollback failed, item quarantined");
                    Err(EngineError::Consolidation(ConsolidationError::RollbackFailed {
                        id: candidate.id.to_string(),
                        from: candidate.from,
                        to: candidate.to,
                        reason: rollback_err.to_string(),
                    }))
                }
            };
        }

        self.audit.emit(AuditEvent::Promoted {
            id: candidate.id,
            from: candidate.from,
            to: candidate.to,
            summary_present,
            embedding_present,
        });

        Ok(PromotionOutcome::Promoted)
    }

    /// Runs one maintenance-cycle batch: loads each candidate id (best
    /// effort — ids that no longer resolve are dropped from ordering,
    /// since `promote_one`'s own read will classify them as
    /// `SourceMissing`), orders by value, then promotes in that order.
    /// A failed rollback is fatal to its own candidate only; the batch
    /// continues.
    pub async fn promote_batch(
        &self,
        ids: &[Uuid],
        from: Tier,
        to: Tier,
        source: &dyn StorageBackend,
        target: &dyn StorageBackend,
    ) -> ConsolidationCycleReport {
        let start = Instant::now();
        let mut loaded: Vec<MemoryItem> = Vec::with_capacity(ids.len());
        for id in ids {
            if let Ok(item) = source.read(*id).await {
                loaded.push(item);
            }
        }
        ordering::sort_candidates(&mut loaded, Utc::now());

        let mut promoted = 0;
        let mut errors = 0;
        let mut quarantined = Vec::new();
        for item in loaded {
            let item_id = item.id;
            let candidate = PromotionCandidate { id: item_id, from, to };
            match self.promote_one(candidate, source, target).await {
                Ok(PromotionOutcome::Promoted) => promoted += 1,
                Ok(_) => {}
                Err(e) => {
                    if matches!(e, EngineError::Consolidation(ConsolidationError::RollbackFailed { .. })) {
                        quarantined.push(item_id);
                    }
                    tracing::warn!(%e, "promotion failed for candidate");
                    errors += 1;
                }
            }
        }

        let duration = start.elapsed();
        self.audit.emit(AuditEvent::ConsolidationCycle {
            from,
            to,
            promoted,
            duration_ms: duration.as_millis() as u64,
            errors,
        });

        ConsolidationCycleReport { promoted, errors, duration, quarantined }
    }
}
