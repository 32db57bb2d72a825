//! Insert, update, get, delete for `memories`. Every write also appends a
//! row to `memory_versions` in the same transaction so the caller's
//! `base_version` checks always have a row to compare against.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use mem_core::errors::{EngineError, EngineResult, StorageError};
use mem_core::model::{Content, MemoryItem, Metadata, Tier};

fn to_sql_err(e: rusqlite::Error) -> EngineError {
    EngineError::Storage(StorageError::Sqlite { message: e.to_string() })
}

fn tier_str(tier: Tier) -> &'static str {
    match tier {
        Tier::Stm => "stm",
        Tier::Mtm => "mtm",
        Tier::Ltm => "ltm",
    }
}

fn tier_from_str(s: &str) -> EngineResult<Tier> {
    match s {
        "stm" => Ok(Tier::Stm),
        "mtm" => Ok(Tier::Mtm),
        "ltm" => Ok(Tier::Ltm),
        other => Err(EngineError::Storage(StorageError::Corrupt {
            message: format!("unknown tier '{other}' in stored record"),
        })),
    }
}

pub fn insert_memory(conn: &Connection, item: &MemoryItem) -> EngineResult<()> {
    let keywords_json = serde_json::to_string(&item.content.keywords)?;
    let metadata_json = serde_json::to_string(&item.metadata)?;
    let embedding_json = item
        .embedding
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO memories (
            id, tier, text, summary, keywords, source, metadata, embedding,
            strength, importance, reinforcement_level, reinforcement_count,
            created_at, last_accessed_at, last_decayed_at, last_reinforced_at, version
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            item.id.to_string(),
            tier_str(item.tier),
            item.content.text,
            item.content.summary,
            keywords_json,
            item.content.source,
            metadata_json,
            embedding_json,
            item.strength,
            item.importance,
            item.reinforcement_level,
            item.reinforcement_count as i64,
            item.created_at.to_rfc3339(),
            item.last_accessed_at.to_rfc3339(),
            item.last_decayed_at.to_rfc3339(),
            item.last_reinforced_at.to_rfc3339(),
            item.version as i64,
        ],
    )
    .map_err(to_sql_err)?;

    super::version_ops::insert_version(conn, item)?;
    Ok(())
}

pub fn get_memory(conn: &Connection, id: Uuid) -> EngineResult<Option<MemoryItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, tier, text, summary, keywords, source, metadata, embedding,
                    strength, importance, reinforcement_level, reinforcement_count,
                    created_at, last_accessed_at, last_decayed_at, last_reinforced_at, version
             FROM memories WHERE id = ?1",
        )
        .map_err(to_sql_err)?;

    let row = stmt
        .query_row(params![id.to_string()], row_to_memory_item)
        .optional()
        .map_err(to_sql_err)?;

    row.transpose()
}

/// Compare-and-swap update. Returns `Conflict` if `base_version` is
/// stale, `NotFound` if the row does not exist.
pub fn update_memory(
    conn: &Connection,
    id: Uuid,
    base_version: u64,
    mutate: impl FnOnce(&mut MemoryItem),
) -> EngineResult<MemoryItem> {
    let mut item = get_memory(conn, id)?.ok_or_else(|| EngineError::NotFound { id: id.to_string() })?;
    if item.version != base_version {
        return Err(EngineError::Conflict {
            id: id.to_string(),
            expected: base_version,
            actual: item.version,
        });
    }
    mutate(&mut item);
    item.version += 1;

    let keywords_json = serde_json::to_string(&item.content.keywords)?;
    let metadata_json = serde_json::to_string(&item.metadata)?;
    let embedding_json = item
        .embedding
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let rows = conn
        .execute(
            "UPDATE memories SET
                tier = ?2, text = ?3, summary = ?4, keywords = ?5, source = ?6,
                metadata = ?7, embedding = ?8, strength = ?9, importance = ?10,
                reinforcement_level = ?11, reinforcement_count = ?12,
                last_accessed_at = ?13, last_decayed_at = ?14, last_reinforced_at = ?15,
                version = ?16
             WHERE id = ?1 AND version = ?17",
            params![
                item.id.to_string(),
                tier_str(item.tier),
                item.content.text,
                item.content.summary,
                keywords_json,
                item.content.source,
                metadata_json,
                embedding_json,
                item.strength,
                item.importance,
                item.reinforcement_level,
                item.reinforcement_count as i64,
                item.last_accessed_at.to_rfc3339(),
                item.last_decayed_at.to_rfc3339(),
                item.last_reinforced_at.to_rfc3339(),
                item.version as i64,
                base_version as i64,
            ],
        )
        .map_err(to_sql_err)?;

    if rows == 0 {
        return Err(EngineError::Conflict {
            id: id.to_string(),
            expected: base_version,
            actual: item.version - 1,
        });
    }

    super::version_ops::insert_version(conn, &item)?;
    Ok(item)
}

pub fn delete_memory(conn: &Connection, id: Uuid) -> EngineResult<bool> {
    let rows = conn
        .execute("DELETE FROM memories WHERE id = ?1", params![id.to_string()])
        .map_err(to_sql_err)?;
    conn.execute(
        "DELETE FROM memory_versions WHERE memory_id = ?1",
        params![id.to_string()],
    )
    .map_err(to_sql_err)?;
    Ok(rows > 0)
}

pub(crate) fn row_to_memory_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<EngineResult<MemoryItem>> {
    Ok(parse_row(row))
}

fn parse_row(row: &rusqlite::Row<'_>) -> EngineResult<MemoryItem> {
    let id_str: String = row.get(0).map_err(to_sql_err)?;
    let tier_s: String = row.get(1).map_err(to_sql_err)?;
    let text: String = row.get(2).map_err(to_sql_err)?;
    let summary: Option<String> = row.get(3).map_err(to_sql_err)?;
    let keywords_json: String = row.get(4).map_err(to_sql_err)?;
    let source: Option<String> = row.get(5).map_err(to_sql_err)?;
    let metadata_json: String = row.get(6).map_err(to_sql_err)?;
    let embedding_json: Option<String> = row.get(7).map_err(to_sql_err)?;
    let strength: f64 = row.get(8).map_err(to_sql_err)?;
    let importance: f64 = row.get(9).map_err(to_sql_err)?;
    let reinforcement_level: f64 = row.get(10).map_err(to_sql_err)?;
    let reinforcement_count: i64 = row.get(11).map_err(to_sql_err)?;
    let created_at: String = row.get(12).map_err(to_sql_err)?;
    let last_accessed_at: String = row.get(13).map_err(to_sql_err)?;
    let last_decayed_at: String = row.get(14).map_err(to_sql_err)?;
    let last_reinforced_at: String = row.get(15).map_err(to_sql_err)?;
    let version: i64 = row.get(16).map_err(to_sql_err)?;

    let parse_dt = |s: &str| -> EngineResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| EngineError::Storage(StorageError::Corrupt {
                message: format!("bad timestamp '{s}': {e}"),
            }))
    };

    let keywords: Vec<String> = serde_json::from_str(&keywords_json)?;
    let metadata: Metadata = serde_json::from_str(&metadata_json)?;
    let embedding: Option<Vec<f32>> = embedding_json.map(|s| serde_json::from_str(&s)).transpose()?;

    Ok(MemoryItem {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            EngineError::Storage(StorageError::Corrupt { message: e.to_string() })
        })?,
        content: Content {
            text,
            summary,
            keywords,
            source,
        },
        metadata,
        embedding,
        tier: tier_from_str(&tier_s)?,
        strength,
        importance,
        reinforcement_level,
        reinforcement_count: reinforcement_count as u64,
        created_at: parse_dt(&created_at)?,
        last_accessed_at: parse_dt(&last_accessed_at)?,
        last_decayed_at: parse_dt(&last_decayed_at)?,
        last_reinforced_at: parse_dt(&last_reinforced_at)?,
        version: version as u64,
    })
}
