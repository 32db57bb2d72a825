//! Staged promotion of records between tiers (STM -> MTM -> LTM): claim
//! arbitration against concurrent promotion attempts, summary/keyword
//! transforms and embedding backfill on the way into LTM, and a
//! transactional write/delete sequence with compensating rollback.

mod admission;
mod claim;
mod ordering;
mod pipeline;
mod transform;

pub use admission::{AlwaysAdmit, TierAdmission};
pub use claim::{ClaimGuard, ClaimRegistry};
pub use ordering::{composite_score, sort_candidates};
pub use pipeline::{ConsolidationCycleReport, ConsolidationPipeline, PromotionCandidate, PromotionOutcome};
