mod consolidation_error;
mod embedding_error;
mod engine_error;
mod graph_error;
mod storage_error;

pub use consolidation_error::ConsolidationError;
pub use embedding_error::EmbeddingError;
pub use engine_error::{EngineError, EngineResult};
pub use graph_error::GraphError;
pub use storage_error::StorageError;
