use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use mem_core::capability::Capabilities;
use mem_core::errors::{EngineError, EngineResult, GraphError};
use mem_core::model::{BatchOp, Direction, MemoryItem, MemoryPatch, Relationship, SearchFilter, SearchHit};
use mem_core::traits::{RelationshipStore, StorageBackend};

use crate::indexed_graph::IndexedGraph;

/// `StorageBackend` + `RelationshipStore` implementation backing LTM.
/// Holds both the record store and the adjacency graph so that deleting
/// a memory can cascade into removing every edge that touches it in one
/// call.
pub struct GraphBackend {
    records: DashMap<Uuid, MemoryItem>,
    graph: RwLock<IndexedGraph>,
}

impl GraphBackend {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            graph: RwLock::new(IndexedGraph::new()),
        }
    }

    fn require_present(&self, id: Uuid) -> EngineResult<()> {
        if self.records.contains_key(&id) {
            Ok(())
        } else {
            Err(EngineError::Graph(GraphError::EndpointNotInLtm { id: id.to_string() }))
        }
    }
}

impl Default for GraphBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for GraphBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::knowledge_graph()
    }

    async fn initialize(&self) -> EngineResult<()> {
        Ok(())
    }

    async fn shutdown(&self) -> EngineResult<()> {
        Ok(())
    }

    async fn create(&self, item: MemoryItem) -> EngineResult<()> {
        match self.records.entry(item.id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(EngineError::AlreadyExists {
                id: item.id.to_string(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(item);
                Ok(())
            }
        }
    }

    async fn read(&self, id: Uuid) -> EngineResult<MemoryItem> {
        self.records
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or_else(|| EngineError::NotFound { id: id.to_string() })
    }

    async fn update(
        &self,
        id: Uuid,
        base_version: u64,
        patch: MemoryPatch,
    ) -> EngineResult<MemoryItem> {
        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound { id: id.to_string() })?;
        if entry.version != base_version {
            return Err(EngineError::Conflict {
                id: id.to_string(),
                expected: base_version,
                actual: entry.version,
            });
        }
        mem_core::model::apply_patch(&mut entry, patch);
        entry.version += 1;
        Ok(entry.clone())
    }

    /// Removes the record and cascades into dropping every edge that
    /// touches it.
    async fn delete(&self, id: Uuid) -> EngineResult<bool> {
        let removed = self.records.remove(&id).is_some();
        if removed {
            self.graph.write().unwrap_or_else(|e| e.into_inner()).remove_all_for(id);
        }
        Ok(removed)
    }

    async fn batch(&self, ops: Vec<BatchOp>) -> EngineResult<()> {
        for op in &ops {
            match op {
                BatchOp::Create(item) => {
                    if self.records.contains_key(&item.id) {
                        return Err(EngineError::AlreadyExists {
                            id: item.id.to_string(),
                        });
                    }
                }
                BatchOp::Update { id, base_version, .. } => {
                    let current = self
                        .records
                        .get(id)
                        .ok_or_else(|| EngineError::NotFound { id: id.to_string() })?;
                    if current.version != *base_version {
                        return Err(EngineError::Conflict {
                            id: id.to_string(),
                            expected: *base_version,
                            actual: current.version,
                        });
                    }
                }
                BatchOp::Delete(_) => {}
            }
        }
        for op in ops {
            match op {
                BatchOp::Create(item) => {
                    self.records.insert(item.id, item);
                }
                BatchOp::Update { id, patch, .. } => {
                    if let Some(mut entry) = self.records.get_mut(&id) {
                        mem_core::model::apply_patch(&mut entry, patch);
                        entry.version += 1;
                    }
                }
                BatchOp::Delete(id) => {
                    if self.records.remove(&id).is_some() {
                        self.graph.write().unwrap_or_else(|e| e.into_inner()).remove_all_for(id);
                    }
                }
            }
        }
        Ok(())
    }

    async fn search(&self, filter: &SearchFilter) -> EngineResult<Vec<SearchHit>> {
        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .filter(|r| filter.matches_scope(r.value()))
            .map(|r| SearchHit {
                id: *r.key(),
                item: r.value().clone(),
                score: 0.0,
            })
            .collect();
        if filter.limit > 0 {
            hits.truncate(filter.limit);
        }
        Ok(hits)
    }

    async fn count(&self, filter: &SearchFilter) -> EngineResult<usize> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches_scope(r.value()))
            .count())
    }
}

#[async_trait]
impl RelationshipStore for GraphBackend {
    async fn add_edge(&self, rel: Relationship) -> EngineResult<()> {
        self.require_present(rel.from)?;
        self.require_present(rel.to)?;
        self.graph.write().unwrap_or_else(|e| e.into_inner()).add_edge(rel);
        Ok(())
    }

    async fn remove_edge(&self, from: Uuid, to: Uuid) -> EngineResult<bool> {
        Ok(self.graph.write().unwrap_or_else(|e| e.into_inner()).remove_edge(from, to))
    }

    async fn get_edges(
        &self,
        id: Uuid,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> EngineResult<Vec<Relationship>> {
        Ok(self
            .graph
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get_edges(id, direction, rel_type))
    }

    async fn neighbors(&self, id: Uuid, depth: usize) -> EngineResult<Vec<Uuid>> {
        Ok(self.graph.read().unwrap_or_else(|e| e.into_inner()).neighbors(id, depth))
    }

    async fn remove_all_for(&self, id: Uuid) -> EngineResult<usize> {
        Ok(self.graph.write().unwrap_or_else(|e| e.into_inner()).remove_all_for(id))
    }
}
