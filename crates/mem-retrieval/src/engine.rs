use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mem_core::config::{ScoreWeights, SearchConfig};
use mem_core::errors::EngineResult;
use mem_core::model::{MemoryPatch, SearchFilter, SearchHit, Tier};
use mem_core::traits::{StorageBackend, VectorSearch};
use mem_vector::similarity;

use crate::lexical::lexical_score;
use crate::query::RetrievalQuery;
use crate::scoring::{candidate_score, composite};

/// One tier's backend, paired with its optional vector-search extension.
/// Built by the caller (the manager owns the concrete backend instances
/// per tier); this crate only reads through the trait objects.
pub struct TierSource<'a> {
    pub tier: Tier,
    pub backend: &'a dyn StorageBackend,
    pub vector: Option<&'a dyn VectorSearch>,
}

fn tier_rank(tier: Tier) -> u8 {
    match tier {
        Tier::Stm => 0,
        Tier::Mtm => 1,
        Tier::Ltm => 2,
    }
}

pub struct RetrievalEngine {
    pub config: SearchConfig,
}

impl RetrievalEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Runs the full cross-tier ranking pipeline against the given
    /// sources and returns the top `query.limit` hits. Tenant/user
    /// isolation and tag filtering are applied as part of per-tier
    /// candidate generation (step 2), since `SearchFilter` already
    /// expresses them; dedup, truncation, and soft reinforcement happen
    /// here afterward.
    pub async fn search(
        &self,
        sources: &[TierSource<'_>],
        query: &RetrievalQuery,
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<SearchHit>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<(Tier, SearchHit)> = Vec::new();

        for source in sources.iter().filter(|s| query.includes(s.tier)) {
            let mut filter = SearchFilter {
                tenant_id: query.tenant_id.clone(),
                user_id: query.user_id.clone(),
                tags: query.tags.clone(),
                limit: query.limit.saturating_mul(self.config.overfetch.max(1)),
                ..Default::default()
            };

            let use_vector = source.vector.is_some() && query.embedding.is_some();
            if use_vector {
                filter.query_embedding = query.embedding.clone();
            }

            let hits = source.backend.search(&filter).await?;
            let weights = ScoreWeights::for_tier(source.tier);

            for mut hit in hits {
                let vector_similarity = if use_vector {
                    hit.score
                } else if let Some(query_embedding) = &query.embedding {
                    hit.item.embedding.as_deref().map_or(0.0, |e| similarity(mem_core::config::Metric::Cosine, query_embedding, e))
                } else {
                    0.0
                };
                let lex = query.text.as_deref().map_or(0.0, |q| lexical_score(q, &hit.item.content.text));
                let score = candidate_score(&hit.item, vector_similarity, lex, now);
                hit.score = composite(&weights, &score);
                candidates.push((source.tier, hit));
            }
        }

        candidates.retain(|(_, hit)| hit.score >= self.config.min_relevance);

        let mut by_id: HashMap<Uuid, (Tier, SearchHit)> = HashMap::new();
        for (tier, hit) in candidates {
            match by_id.get(&hit.id) {
                Some((existing_tier, _)) if tier_rank(*existing_tier) >= tier_rank(tier) => {}
                _ => {
                    by_id.insert(hit.id, (tier, hit));
                }
            }
        }

        let mut merged: Vec<(Tier, SearchHit)> = by_id.into_values().collect();
        merged.sort_by(|a, b| {
            b.1.score
                .partial_cmp(&a.1.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.1.item.last_accessed_at.cmp(&a.1.item.last_accessed_at))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        merged.truncate(query.limit);

        self.reinforce_returned(&merged, sources, now).await;

        Ok(merged.into_iter().map(|(_, hit)| hit).collect())
    }

    async fn reinforce_returned(&self, hits: &[(Tier, SearchHit)], sources: &[TierSource<'_>], now: DateTime<Utc>) {
        let strengthen = self.config.reinforcement_on_read;
        if strengthen <= 0.0 {
            return;
        }
        for (tier, hit) in hits {
            let Some(source) = sources.iter().find(|s| s.tier == *tier) else { continue };
            let mut item = hit.item.clone();
            mem_decay::reinforce(&mut item, &mem_core::config::DecayParams::default(), strengthen, now);
            let patch = MemoryPatch {
                strength: Some(item.strength),
                reinforcement_level: Some(item.reinforcement_level),
                reinforcement_count: Some(item.reinforcement_count),
                last_accessed_at: Some(now),
                last_reinforced_at: Some(item.last_reinforced_at),
                ..Default::default()
            };
            if let Err(e) = source.backend.update(hit.id, hit.item.version, patch).await {
                tracing::debug!(id = %hit.id, error = %e, "soft reinforcement skipped, record changed concurrently");
            }
        }
    }
}
