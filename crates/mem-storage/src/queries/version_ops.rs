//! Append-only version history for LTM audit/rollback support. Every
//! successful insert or update appends one row here; retention trimming
//! is the caller's responsibility (the maintenance quality sweep runs it
//! periodically rather than on every write, to keep the write path cheap).

use rusqlite::{params, Connection};

use mem_core::errors::{EngineError, EngineResult, StorageError};
use mem_core::model::MemoryItem;

fn to_sql_err(e: rusqlite::Error) -> EngineError {
    EngineError::Storage(StorageError::Sqlite { message: e.to_string() })
}

#[derive(Debug, Clone)]
pub struct MemoryVersionRow {
    pub memory_id: String,
    pub version: u64,
    pub text: String,
    pub summary: Option<String>,
    pub created_at: String,
}

pub fn insert_version(conn: &Connection, item: &MemoryItem) -> EngineResult<()> {
    let keywords_json = serde_json::to_string(&item.content.keywords)?;
    let metadata_json = serde_json::to_string(&item.metadata)?;
    conn.execute(
        "INSERT OR REPLACE INTO memory_versions
            (memory_id, version, text, summary, keywords, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.id.to_string(),
            item.version as i64,
            item.content.text,
            item.content.summary,
            keywords_json,
            metadata_json,
            item.last_accessed_at.to_rfc3339(),
        ],
    )
    .map_err(to_sql_err)?;
    Ok(())
}

pub fn get_version_history(conn: &Connection, memory_id: &str) -> EngineResult<Vec<MemoryVersionRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT memory_id, version, text, summary, created_at
             FROM memory_versions WHERE memory_id = ?1 ORDER BY version DESC",
        )
        .map_err(to_sql_err)?;

    let rows = stmt
        .query_map(params![memory_id], |row| {
            Ok(MemoryVersionRow {
                memory_id: row.get(0)?,
                version: row.get::<_, i64>(1)? as u64,
                text: row.get(2)?,
                summary: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .map_err(to_sql_err)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(to_sql_err)
}

pub fn version_count(conn: &Connection, memory_id: &str) -> EngineResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM memory_versions WHERE memory_id = ?1",
        params![memory_id],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(to_sql_err)
}

/// Keep only the latest `max_versions` rows for a memory.
pub fn enforce_retention(conn: &Connection, memory_id: &str, max_versions: u64) -> EngineResult<usize> {
    conn.execute(
        "DELETE FROM memory_versions
         WHERE memory_id = ?1 AND version NOT IN (
            SELECT version FROM memory_versions
            WHERE memory_id = ?1 ORDER BY version DESC LIMIT ?2
         )",
        params![memory_id, max_versions as i64],
    )
    .map_err(to_sql_err)
}
