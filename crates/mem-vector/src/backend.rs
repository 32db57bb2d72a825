use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use mem_core::capability::Capabilities;
use mem_core::config::VectorConfig;
use mem_core::errors::{EngineError, EngineResult};
use mem_core::model::{BatchOp, MemoryItem, MemoryPatch, SearchFilter, SearchHit};
use mem_core::traits::{StorageBackend, VectorSearch};

use crate::arena::Arena;
use crate::metric::similarity;

/// `StorageBackend` + `VectorSearch` implementation backing tiers that
/// need k-NN recall (MTM, LTM). CRUD mirrors `mem-storage`'s in-memory
/// backend; the addition is the similarity arena and the warm-up
/// threshold that decides when to use it instead of a direct scan.
pub struct VectorBackend {
    config: VectorConfig,
    records: DashMap<Uuid, MemoryItem>,
    arena: RwLock<Option<Arena>>,
}

impl VectorBackend {
    pub fn new(config: VectorConfig) -> Self {
        Self {
            config,
            records: DashMap::new(),
            arena: RwLock::new(None),
        }
    }

    fn invalidate_arena(&self) {
        *self.arena.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn ensure_arena(&self) {
        if self.records.len() < self.config.warm_up_threshold {
            return;
        }
        let needs_build = self.arena.read().unwrap_or_else(|e| e.into_inner()).is_none();
        if !needs_build {
            return;
        }
        let items = self.records.iter().filter_map(|r| {
            r.value().embedding.clone().map(|emb| (*r.key(), emb))
        });
        let arena = Arena::build(items);
        *self.arena.write().unwrap_or_else(|e| e.into_inner()) = Some(arena);
    }
}

#[async_trait]
impl StorageBackend for VectorBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::vector()
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
                self.invalidate_arena();
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
        let out = entry.clone();
        drop(entry);
        self.invalidate_arena();
        Ok(out)
    }

    async fn delete(&self, id: Uuid) -> EngineResult<bool> {
        let removed = self.records.remove(&id).is_some();
        if removed {
            self.invalidate_arena();
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
                    self.records.remove(&id);
                }
            }
        }
        self.invalidate_arena();
        Ok(())
    }

    async fn search(&self, filter: &SearchFilter) -> EngineResult<Vec<SearchHit>> {
        if let Some(query) = &filter.query_embedding {
            let k = if filter.limit == 0 { usize::MAX } else { filter.limit };
            return self.vector_search(query, filter, k).await;
        }
        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .filter(|r| filter.matches_scope(r.value()))
            .map(|r| SearchHit {
                id: r.key().clone(),
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
impl VectorSearch for VectorBackend {
    async fn vector_search(
        &self,
        query: &[f32],
        filter: &SearchFilter,
        k: usize,
    ) -> EngineResult<Vec<SearchHit>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query = if self.config.normalize {
            crate::metric::normalize(query)
        } else {
            query.to_vec()
        };

        self.ensure_arena();
        let arena_guard = self.arena.read().unwrap_or_else(|e| e.into_inner());

        let mut hits: Vec<SearchHit> = if let Some(arena) = arena_guard.as_ref() {
            arena
                .ids
                .iter()
                .zip(arena.vectors.iter())
                .filter_map(|(id, vector)| {
                    let item = self.records.get(id)?.value().clone();
                    if !filter.matches_scope(&item) {
                        return None;
                    }
                    let score = similarity(self.config.metric, &query, vector);
                    Some(SearchHit { id: *id, item, score })
                })
                .collect()
        } else {
            drop(arena_guard);
            self.records
                .iter()
                .filter_map(|r| {
                    let item = r.value().clone();
                    if !filter.matches_scope(&item) {
                        return None;
                    }
                    let embedding = item.embedding.as_ref()?;
                    let score = similarity(self.config.metric, &query, embedding);
                    Some(SearchHit { id: *r.key(), item, score })
                })
                .collect()
        };

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}
