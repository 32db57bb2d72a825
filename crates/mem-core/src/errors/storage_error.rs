/// Errors raised by a [`crate::traits::StorageBackend`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("transient I/O failure: {message}")]
    Transient { message: String },

    #[error("persisted state invariant violated: {message}")]
    Corrupt { message: String },

    #[error("backend capacity exceeded")]
    CapacityExceeded,

    #[error("operation unsupported by this backend: {op}")]
    Unsupported { op: String },
}
