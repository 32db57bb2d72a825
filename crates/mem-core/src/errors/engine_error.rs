use super::{ConsolidationError, EmbeddingError, GraphError, StorageError};

/// Top-level error type for the memory engine. Each kind is either
/// surfaced directly to the caller, or retried/absorbed internally by
/// the orchestrator and consolidation pipeline before being surfaced.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("memory not found: {id}")]
    NotFound { id: String },

    #[error("memory already exists: {id}")]
    AlreadyExists { id: String },

    #[error("version conflict on {id}: expected {expected}, found {actual}")]
    Conflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("capacity exceeded in tier {tier:?}")]
    CapacityExceeded { tier: crate::model::Tier },

    #[error("rejected by sanitizer: {reason}")]
    Rejected { reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("unsupported operation: {op}")]
    Unsupported { op: String },

    #[error("tier {tier:?} unavailable: {reason}")]
    TierUnavailable {
        tier: crate::model::Tier,
        reason: String,
    },

    #[error("promotion of {id} left in an inconsistent state and is quarantined")]
    PromotionInconsistent { id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("consolidation error: {0}")]
    Consolidation(#[from] ConsolidationError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    /// Whether this error kind is safe to retry internally (orchestrator,
    /// consolidation pipeline). Non-retriable kinds are surfaced to the
    /// caller immediately.
    pub fn is_retriable(&self) -> bool {
        matches!(self, EngineError::Storage(StorageError::Transient { .. }))
    }
}

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
