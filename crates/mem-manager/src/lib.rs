//! Public façade composing the three tiers, the cross-cutting guard
//! services ([`mem_guard`]), cross-tier search ([`mem_retrieval`]), and
//! the maintenance orchestrator ([`mem_maintenance`]) into one handle a
//! host application constructs once and holds for the life of the
//! process.

mod builder;
mod manager;

pub use builder::MemoryManagerBuilder;
pub use manager::{MemoryManager, NewMemory};
