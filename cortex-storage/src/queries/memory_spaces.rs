use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::models::MemorySpace;

use crate::to_storage_err;

fn row_to_space(data: String) -> CortexResult<MemorySpace> {
    serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string()))
}

pub fn create(conn: &Connection, space: &MemorySpace) -> CortexResult<()> {
    let data = serde_json::to_string(space).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO memory_spaces (memory_space_id, space_type, status, tenant_id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            space.memory_space_id,
            serde_json::to_string(&space.space_type).unwrap_or_default(),
            serde_json::to_string(&space.status).unwrap_or_default(),
            space.tenant_id,
            data,
            space.created_at.to_rfc3339(),
            space.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get(conn: &Connection, memory_space_id: &str) -> CortexResult<Option<MemorySpace>> {
    conn.query_row(
        "SELECT data FROM memory_spaces WHERE memory_space_id = ?1",
        params![memory_space_id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(row_to_space)
    .transpose()
}

/// Scans every row's JSON blob since `participants` isn't a dedicated,
/// indexed column (memory spaces are low-cardinality compared to the other
/// six collections).
pub fn list_for_participant(conn: &Connection, participant_id: &str) -> CortexResult<Vec<MemorySpace>> {
    let mut stmt = conn
        .prepare("SELECT data FROM memory_spaces ORDER BY updated_at DESC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        let space = row_to_space(row.map_err(|e| to_storage_err(e.to_string()))?)?;
        if space.participants.iter().any(|p| p == participant_id) {
            out.push(space);
        }
    }
    Ok(out)
}

pub fn archive(conn: &Connection, memory_space_id: &str) -> CortexResult<()> {
    let mut space = get(conn, memory_space_id)?.ok_or_else(|| cortex_core::errors::StorageError::NotFound {
        collection: "memory_spaces".to_string(),
        id: memory_space_id.to_string(),
    })?;
    space.status = cortex_core::models::MemorySpaceStatus::Archived;
    space.updated_at = chrono::Utc::now();
    let data = serde_json::to_string(&space).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "UPDATE memory_spaces SET status = ?1, data = ?2, updated_at = ?3 WHERE memory_space_id = ?4",
        params![
            serde_json::to_string(&space.status).unwrap_or_default(),
            data,
            space.updated_at.to_rfc3339(),
            memory_space_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
