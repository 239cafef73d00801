use rusqlite::{params, Connection};

use cortex_core::errors::CortexResult;
use cortex_core::models::FactHistoryEntry;

use crate::to_storage_err;

pub fn append(conn: &Connection, entry: &FactHistoryEntry) -> CortexResult<()> {
    let data = serde_json::to_string(entry).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO fact_history (id, fact_id, memory_space_id, action, data, created_at, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.event_id,
            entry.fact_id,
            entry.memory_space_id,
            serde_json::to_string(&entry.action).unwrap_or_default(),
            data,
            entry.timestamp.to_rfc3339(),
            entry.user_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// GDPR cascade hook (spec §4.8).
pub fn delete_for_user(conn: &Connection, user_id: &str) -> CortexResult<usize> {
    conn.execute("DELETE FROM fact_history WHERE user_id = ?1", params![user_id])
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_for_fact(conn: &Connection, fact_id: &str) -> CortexResult<Vec<FactHistoryEntry>> {
    let mut stmt = conn
        .prepare("SELECT data FROM fact_history WHERE fact_id = ?1 ORDER BY created_at ASC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![fact_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        let data = row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(out)
}
