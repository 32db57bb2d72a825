use async_trait::async_trait;
use uuid::Uuid;

use crate::capability::Capabilities;
use crate::errors::EngineResult;
use crate::model::{BatchOp, MemoryItem, MemoryPatch, SearchFilter, SearchHit};

/// Atomic CRUD and query primitives for one tier's records.
/// `initialize`/`shutdown` bracket the backend's resource lifetime
/// (connections, file handles); every other method assumes the backend is
/// initialized.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    async fn initialize(&self) -> EngineResult<()>;
    async fn shutdown(&self) -> EngineResult<()>;

    /// Fails with `AlreadyExists` if `item.id` is already present.
    async fn create(&self, item: MemoryItem) -> EngineResult<()>;

    /// Fails with `NotFound` if absent.
    async fn read(&self, id: Uuid) -> EngineResult<MemoryItem>;

    /// Compare-and-swap on `version`. Fails with `Conflict` if
    /// `base_version` does not match the stored version, `NotFound` if
    /// absent.
    async fn update(
        &self,
        id: Uuid,
        base_version: u64,
        patch: MemoryPatch,
    ) -> EngineResult<MemoryItem>;

    /// Idempotent; returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> EngineResult<bool>;

    /// All-or-nothing application of a list of CRUD ops. Backends that
    /// cannot implement this atomically must return `Unsupported`.
    async fn batch(&self, ops: Vec<BatchOp>) -> EngineResult<()>;

    async fn search(&self, filter: &SearchFilter) -> EngineResult<Vec<SearchHit>>;

    async fn count(&self, filter: &SearchFilter) -> EngineResult<usize>;
}
