/// Errors raised by a [`crate::traits::EmbeddingProvider`].
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("embedding request failed: {0}")]
    Transient(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
