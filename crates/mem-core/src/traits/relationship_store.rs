use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::EngineResult;
use crate::model::{Direction, Relationship};

/// Extension implemented by backends whose
/// [`crate::capability::Capabilities::relationship_store`] is set.
/// Implementations must mirror every edge write into both endpoints'
/// adjacency lists atomically.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    async fn add_edge(&self, rel: Relationship) -> EngineResult<()>;

    async fn remove_edge(&self, from: Uuid, to: Uuid) -> EngineResult<bool>;

    async fn get_edges(
        &self,
        id: Uuid,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> EngineResult<Vec<Relationship>>;

    /// Bounded breadth-first traversal from `id` out to `depth` hops.
    async fn neighbors(&self, id: Uuid, depth: usize) -> EngineResult<Vec<Uuid>>;

    /// Remove every edge touching `id` (cascade on memory deletion).
    async fn remove_all_for(&self, id: Uuid) -> EngineResult<usize>;
}
