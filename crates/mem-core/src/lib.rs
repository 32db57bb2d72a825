//! Core types shared across the memory engine: the memory/relationship
//! data model, the error taxonomy, per-subsystem configuration, the
//! storage-backend capability descriptor, and the trait seams
//! (`StorageBackend`, `VectorSearch`, `RelationshipStore`,
//! `EmbeddingProvider`, `AuditSink`, `MetricsSink`) every other crate in
//! the workspace builds on.

pub mod capability;
pub mod config;
pub mod errors;
pub mod model;
pub mod traits;

pub use capability::Capabilities;
pub use errors::{EngineError, EngineResult};
