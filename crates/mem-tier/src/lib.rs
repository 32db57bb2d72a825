//! Tier policy wrappers around a `StorageBackend`: STM's TTL/eviction,
//! MTM's decay-and-promote cycle, and LTM's terminal, relationship-aware
//! residency. Each tier owns its own promotion-eligibility rule; the
//! consolidation pipeline decides what to do with the candidate ids.

mod ltm;
mod mtm;
mod stm;

pub use ltm::LtmTier;
pub use mtm::MtmTier;
pub use stm::StmTier;
