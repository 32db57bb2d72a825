//! Cross-tier ranked search: per-tier candidate generation (metadata
//! filters plus optional vector k-NN), lexical scoring, a tier-weighted
//! composite score, dedup across tiers, and soft reinforcement of
//! returned items.

mod engine;
mod lexical;
mod query;
mod scoring;

pub use engine::{RetrievalEngine, TierSource};
pub use lexical::lexical_score;
pub use query::RetrievalQuery;
pub use scoring::{candidate_score, composite, recency_decay, CandidateScore};
