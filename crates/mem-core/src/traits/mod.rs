mod embedding_provider;
mod relationship_store;
mod sinks;
mod storage_backend;
mod vector_search;

pub use embedding_provider::EmbeddingProvider;
pub use relationship_store::RelationshipStore;
pub use sinks::{AuditSink, MetricsSink, NullSink};
pub use storage_backend::StorageBackend;
pub use vector_search::VectorSearch;
