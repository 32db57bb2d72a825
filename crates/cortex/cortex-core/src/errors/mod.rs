mod causal_error;
mod cloud_error;
mod consolidation_error;
mod cortex_error;
mod embedding_error;
mod retrieval_error;
mod storage_error;
mod temporal_error;

pub use causal_error::CausalError;
pub use cloud_error::CloudError;
pub use consolidation_error::ConsolidationError;
pub use cortex_error::{CortexError, CortexResult};
pub use embedding_error::EmbeddingError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;
pub use temporal_error::TemporalError;
