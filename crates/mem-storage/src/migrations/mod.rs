//! Schema creation and forward-only migrations for the embedded SQL
//! backend. There is no down-migration support; a new column is always
//! additive with a `DEFAULT`, matching what running instances expect.

use rusqlite::Connection;

use mem_core::errors::{EngineError, EngineResult, StorageError};

const CURRENT_SCHEMA_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> EngineResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS schema_meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS memories (
            id                  TEXT PRIMARY KEY,
            tier                TEXT NOT NULL,
            text                TEXT NOT NULL,
            summary             TEXT,
            keywords            TEXT NOT NULL DEFAULT '[]',
            source              TEXT,
            metadata            TEXT NOT NULL DEFAULT '{}',
            embedding           TEXT,
            strength            REAL NOT NULL,
            importance          REAL NOT NULL,
            reinforcement_level REAL NOT NULL,
            reinforcement_count INTEGER NOT NULL,
            created_at          TEXT NOT NULL,
            last_accessed_at    TEXT NOT NULL,
            last_decayed_at     TEXT NOT NULL,
            last_reinforced_at  TEXT NOT NULL,
            version             INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_tier ON memories(tier);
        CREATE INDEX IF NOT EXISTS idx_memories_created_at ON memories(created_at);

        CREATE TABLE IF NOT EXISTS memory_versions (
            memory_id  TEXT NOT NULL,
            version    INTEGER NOT NULL,
            text       TEXT NOT NULL,
            summary    TEXT,
            keywords   TEXT NOT NULL DEFAULT '[]',
            metadata   TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            PRIMARY KEY (memory_id, version)
        );
        ",
    )
    .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        [CURRENT_SCHEMA_VERSION.to_string()],
    )
    .map_err(|e| EngineError::Storage(StorageError::Sqlite { message: e.to_string() }))?;

    Ok(())
}
