use rusqlite::{params, Connection};

use cortex_core::errors::CortexResult;
use cortex_core::models::{GdprCascadeJob, GovernanceEnforcement};

use crate::to_storage_err;

pub fn record_enforcement(conn: &Connection, entry: &GovernanceEnforcement) -> CortexResult<()> {
    conn.execute(
        "INSERT INTO governance_enforcement_log
            (id, memory_space_id, collection, versions_deleted, records_purged, storage_freed_bytes, enforced_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id,
            entry.memory_space_id,
            entry.collection,
            entry.versions_deleted as i64,
            entry.records_purged as i64,
            entry.storage_freed_bytes as i64,
            entry.enforced_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Most recently created cascade job for a user, if one is still pending
/// (spec §4.8 resumability).
pub fn get_cascade_job(conn: &Connection, user_id: &str) -> CortexResult<Option<GdprCascadeJob>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, user_id, pending_collections, created_at, updated_at
             FROM gdpr_cascade_jobs WHERE user_id = ?1 ORDER BY created_at DESC LIMIT 1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    for row in rows {
        let (id, user_id, pending_raw, created_at, updated_at) = row.map_err(|e| to_storage_err(e.to_string()))?;
        return Ok(Some(GdprCascadeJob {
            id,
            user_id,
            pending_collections: serde_json::from_str(&pending_raw).map_err(|e| to_storage_err(e.to_string()))?,
            created_at: created_at.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
            updated_at: updated_at.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
        }));
    }
    Ok(None)
}

pub fn create_cascade_job(conn: &Connection, job: &GdprCascadeJob) -> CortexResult<()> {
    let pending = serde_json::to_string(&job.pending_collections).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO gdpr_cascade_jobs (id, user_id, pending_collections, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![job.id, job.user_id, pending, job.created_at.to_rfc3339(), job.updated_at.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_cascade_job(conn: &Connection, job: &GdprCascadeJob) -> CortexResult<()> {
    let pending = serde_json::to_string(&job.pending_collections).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "UPDATE gdpr_cascade_jobs SET pending_collections = ?1, updated_at = ?2 WHERE id = ?3",
        params![pending, job.updated_at.to_rfc3339(), job.id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_cascade_job(conn: &Connection, id: &str) -> CortexResult<()> {
    conn.execute("DELETE FROM gdpr_cascade_jobs WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
