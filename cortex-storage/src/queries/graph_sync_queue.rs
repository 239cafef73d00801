use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use cortex_core::errors::CortexResult;
use cortex_core::models::{GraphSyncOperation, GraphSyncQueueEntry};

use crate::to_storage_err;

fn row_to_entry(
    id: String,
    table: String,
    entity_id: String,
    operation: String,
    entity: Option<String>,
    synced: i64,
    failed_attempts: i64,
    last_error: Option<String>,
    next_attempt_at: String,
    dead_lettered: i64,
    priority: Option<i64>,
    created_at: String,
    updated_at: String,
) -> CortexResult<GraphSyncQueueEntry> {
    Ok(GraphSyncQueueEntry {
        id,
        table,
        entity_id,
        operation: serde_json::from_str(&operation).map_err(|e| to_storage_err(e.to_string()))?,
        entity: entity
            .map(|e| serde_json::from_str(&e))
            .transpose()
            .map_err(|e| to_storage_err(e.to_string()))?,
        synced: synced != 0,
        failed_attempts: failed_attempts as u32,
        last_error,
        next_attempt_at: next_attempt_at.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
        dead_lettered: dead_lettered != 0,
        priority: priority.map(|p| p as u8),
        created_at: created_at.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
        updated_at: updated_at.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
    })
}

pub fn enqueue(
    conn: &Connection,
    table: &str,
    entity_id: &str,
    operation: GraphSyncOperation,
    entity: serde_json::Value,
    priority: Option<u8>,
) -> CortexResult<String> {
    let entry = GraphSyncQueueEntry::new(table, entity_id, operation, Some(entity));
    let entity_json = entry
        .entity
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO graph_sync_queue
            (id, entity_table, entity_id, operation, entity, synced, failed_attempts,
             last_error, next_attempt_at, dead_lettered, priority, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, NULL, ?6, 0, ?7, ?8, ?9)",
        params![
            entry.id,
            entry.table,
            entry.entity_id,
            serde_json::to_string(&entry.operation).unwrap_or_default(),
            entity_json,
            entry.next_attempt_at.to_rfc3339(),
            priority.map(|p| p as i64),
            entry.created_at.to_rfc3339(),
            entry.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(entry.id)
}

/// Claim up to `limit` due, non-dead-lettered entries ordered by priority
/// then age (spec §4.7).
pub fn claim_batch(conn: &Connection, limit: usize) -> CortexResult<Vec<GraphSyncQueueEntry>> {
    let now = Utc::now().to_rfc3339();
    let mut stmt = conn
        .prepare(
            "SELECT id, entity_table, entity_id, operation, entity, synced, failed_attempts,
                    last_error, next_attempt_at, dead_lettered, priority, created_at, updated_at
             FROM graph_sync_queue
             WHERE synced = 0 AND dead_lettered = 0 AND next_attempt_at <= ?1
             ORDER BY priority DESC, created_at ASC
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![now, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, i64>(9)?,
                row.get::<_, Option<i64>>(10)?,
                row.get::<_, String>(11)?,
                row.get::<_, String>(12)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, table, entity_id, operation, entity, synced, failed_attempts, last_error, next_attempt_at, dead_lettered, priority, created_at, updated_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(row_to_entry(
            id, table, entity_id, operation, entity, synced, failed_attempts, last_error,
            next_attempt_at, dead_lettered, priority, created_at, updated_at,
        )?);
    }
    Ok(out)
}

pub fn mark_synced(conn: &Connection, id: &str) -> CortexResult<()> {
    conn.execute(
        "UPDATE graph_sync_queue SET synced = 1, updated_at = ?1 WHERE id = ?2",
        params![Utc::now().to_rfc3339(), id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn mark_failed(conn: &Connection, id: &str, error: &str, next_attempt_at: DateTime<Utc>) -> CortexResult<()> {
    conn.execute(
        "UPDATE graph_sync_queue
         SET failed_attempts = failed_attempts + 1, last_error = ?1, next_attempt_at = ?2, updated_at = ?3
         WHERE id = ?4",
        params![error, next_attempt_at.to_rfc3339(), Utc::now().to_rfc3339(), id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn mark_dead_lettered(conn: &Connection, id: &str, error: &str) -> CortexResult<()> {
    conn.execute(
        "UPDATE graph_sync_queue SET dead_lettered = 1, last_error = ?1, updated_at = ?2 WHERE id = ?3",
        params![error, Utc::now().to_rfc3339(), id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Garbage-collect synced rows older than `older_than`, keeping the table
/// from growing unbounded (spec §4.7, `synced_retention_secs`).
pub fn reap_synced(conn: &Connection, older_than: DateTime<Utc>) -> CortexResult<usize> {
    conn.execute(
        "DELETE FROM graph_sync_queue WHERE synced = 1 AND updated_at < ?1",
        params![older_than.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
