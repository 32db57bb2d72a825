use chrono::{DateTime, Utc};

use mem_core::config::ScoreWeights;
use mem_core::model::MemoryItem;

/// The five inputs to the composite ranking score, already normalized to
/// `[0, 1]` (importance and strength are stored that way; vector
/// similarity and lexical overlap are bounded by construction; recency
/// decays toward zero and never below it).
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateScore {
    pub vector_similarity: f64,
    pub lexical_score: f64,
    pub importance: f64,
    pub strength: f64,
    pub recency_decay: f64,
}

/// `recency_decay` term: halves roughly every hour of age, floored at
/// the same one-hour characteristic scale used by consolidation
/// ordering (the two are independent callers of the same shape, not a
/// shared dependency — this crate is not supposed to depend on
/// consolidation for a one-line formula).
pub fn recency_decay(item: &MemoryItem, now: DateTime<Utc>) -> f64 {
    let age_secs = (now - item.last_accessed_at).num_seconds().max(0) as f64;
    1.0 / (1.0 + age_secs / 3600.0)
}

pub fn candidate_score(item: &MemoryItem, vector_similarity: f64, lexical_score: f64, now: DateTime<Utc>) -> CandidateScore {
    CandidateScore {
        vector_similarity,
        lexical_score,
        importance: item.importance,
        strength: item.strength,
        recency_decay: recency_decay(item, now),
    }
}

pub fn composite(weights: &ScoreWeights, score: &CandidateScore) -> f64 {
    weights.alpha_vector * score.vector_similarity
        + weights.beta_lexical * score.lexical_score
        + weights.gamma_importance * score.importance
        + weights.delta_strength * score.strength
        + weights.epsilon_recency * score.recency_decay
}
