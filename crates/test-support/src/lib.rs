//! Fixtures shared across the workspace's test suites: a deterministic
//! embedder and small memory-item builders, so individual crates don't
//! each reinvent a fake embedding function.

mod embedder;
mod fixtures;

pub use embedder::{deterministic_embedding, DeterministicEmbedder};
pub use fixtures::{fixed_clock, memory_in, memory_with_importance};
