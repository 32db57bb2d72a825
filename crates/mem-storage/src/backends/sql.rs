//! Embedded SQLite backend. Durable, single-file, suited to MTM and LTM.
//!
//! `rusqlite::Connection` is not `Send` across `.await` points the way an
//! async driver would be, so every call takes the connection's blocking
//! mutex inside `spawn_blocking` rather than holding it across awaits.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use uuid::Uuid;

use mem_core::capability::Capabilities;
use mem_core::errors::{EngineError, EngineResult, StorageError};
use mem_core::model::{BatchOp, MemoryItem, MemoryPatch, SearchFilter, SearchHit};
use mem_core::traits::StorageBackend;

use crate::lexical::lexical_score;
use crate::migrations;
use crate::patch::apply_patch;
use crate::queries::memory_crud;

pub struct SqlBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqlBackend {
    pub fn open(path: impl AsRef<std::path::Path>) -> EngineResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Trims each memory's version history down to `max_versions` rows.
    /// Run periodically by the maintenance quality sweep rather than on
    /// every write, per `queries::version_ops`'s module doc.
    pub async fn enforce_version_retention(&self, max_versions: u64) -> EngineResult<usize> {
        self.blocking(move |conn| {
            let mut stmt = conn
                .prepare("SELECT DISTINCT id FROM memories")
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;
            let ids: Vec<String> = stmt
                .query_map([], |row| row.get(0))
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?
                .collect::<Result<_, _>>()
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;

            let mut trimmed = 0usize;
            for id in ids {
                trimmed += crate::queries::version_ops::enforce_retention(conn, &id, max_versions)?;
            }
            Ok(trimmed)
        })
        .await
    }

    async fn blocking<F, T>(&self, f: F) -> EngineResult<T>
    where
        F: FnOnce(&Connection) -> EngineResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| {
                EngineError::Storage(StorageError::Corrupt {
                    message: "sqlite connection mutex poisoned by a panicking holder".into(),
                })
            })?;
            f(&guard)
        })
        .await
        .map_err(|e| EngineError::Storage(StorageError::Transient { message: e.to_string() }))?
    }
}

#[async_trait]
impl StorageBackend for SqlBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::embedded_sql()
    }

    async fn initialize(&self) -> EngineResult<()> {
        Ok(())
    }

    async fn shutdown(&self) -> EngineResult<()> {
        self.blocking(|conn| {
            conn.execute_batch("PRAGMA optimize;")
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))
        })
        .await
    }

    async fn create(&self, item: MemoryItem) -> EngineResult<()> {
        self.blocking(move |conn| {
            if memory_crud::get_memory(conn, item.id)?.is_some() {
                return Err(EngineError::AlreadyExists { id: item.id.to_string() });
            }
            memory_crud::insert_memory(conn, &item)
        })
        .await
    }

    async fn read(&self, id: Uuid) -> EngineResult<MemoryItem> {
        self.blocking(move |conn| {
            memory_crud::get_memory(conn, id)?.ok_or(EngineError::NotFound { id: id.to_string() })
        })
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        base_version: u64,
        patch: MemoryPatch,
    ) -> EngineResult<MemoryItem> {
        self.blocking(move |conn| {
            memory_crud::update_memory(conn, id, base_version, |item| apply_patch(item, patch))
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> EngineResult<bool> {
        self.blocking(move |conn| memory_crud::delete_memory(conn, id)).await
    }

    async fn batch(&self, ops: Vec<BatchOp>) -> EngineResult<()> {
        self.blocking(move |conn| {
            conn.execute("BEGIN IMMEDIATE", [])
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;

            let result = (|| -> EngineResult<()> {
                for op in ops {
                    match op {
                        BatchOp::Create(item) => {
                            if memory_crud::get_memory(conn, item.id)?.is_some() {
                                return Err(EngineError::AlreadyExists { id: item.id.to_string() });
                            }
                            memory_crud::insert_memory(conn, &item)?;
                        }
                        BatchOp::Update { id, base_version, patch } => {
                            memory_crud::update_memory(conn, id, base_version, |item| {
                                apply_patch(item, patch)
                            })?;
                        }
                        BatchOp::Delete(id) => {
                            memory_crud::delete_memory(conn, id)?;
                        }
                    }
                }
                Ok(())
            })();

            match &result {
                Ok(()) => conn
                    .execute("COMMIT", [])
                    .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?,
                Err(_) => conn
                    .execute("ROLLBACK", [])
                    .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?,
            };
            result
        })
        .await
    }

    async fn search(&self, filter: &SearchFilter) -> EngineResult<Vec<SearchHit>> {
        let filter = filter.clone();
        self.blocking(move |conn| {
            let mut stmt = conn
                .prepare("SELECT id FROM memories")
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;
            let ids: Vec<String> = stmt
                .query_map([], |row| row.get(0))
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?
                .collect::<Result<_, _>>()
                .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;

            let mut hits = Vec::new();
            for id_str in ids {
                let id = Uuid::parse_str(&id_str).map_err(|e| {
                    EngineError::Storage(StorageError::Corrupt { message: e.to_string() })
                })?;
                if let Some(item) = memory_crud::get_memory(conn, id)? {
                    if !filter.matches_scope(&item) {
                        continue;
                    }
                    let score = filter
                        .full_text
                        .as_deref()
                        .map(|q| lexical_score(q, &item.content.text))
                        .unwrap_or(0.0);
                    hits.push(SearchHit { id: item.id, item, score });
                }
            }
            hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
            if filter.limit > 0 {
                hits.truncate(filter.limit);
            }
            Ok(hits)
        })
        .await
    }

    async fn count(&self, filter: &SearchFilter) -> EngineResult<usize> {
        Ok(self.search(filter).await?.len())
    }
}
