use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::models::Context;

use crate::to_storage_err;

fn row_to_context(data: String) -> CortexResult<Context> {
    serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string()))
}

pub fn create(conn: &Connection, context: &Context) -> CortexResult<()> {
    let data = serde_json::to_string(context).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO contexts
            (context_id, memory_space_id, parent_id, root_id, depth, status, user_id,
             tenant_id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            context.context_id,
            context.memory_space_id,
            context.parent_id,
            context.root_id,
            context.depth as i64,
            serde_json::to_string(&context.status).unwrap_or_default(),
            context.user_id,
            context.tenant_id,
            data,
            context.created_at.to_rfc3339(),
            context.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get(conn: &Connection, context_id: &str) -> CortexResult<Option<Context>> {
    conn.query_row(
        "SELECT data FROM contexts WHERE context_id = ?1",
        params![context_id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(row_to_context)
    .transpose()
}

pub fn list_children(conn: &Connection, parent_id: &str) -> CortexResult<Vec<Context>> {
    let mut stmt = conn
        .prepare("SELECT data FROM contexts WHERE parent_id = ?1 ORDER BY created_at ASC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![parent_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row_to_context(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(out)
}

pub fn update(conn: &Connection, context: &Context) -> CortexResult<()> {
    let data = serde_json::to_string(context).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "UPDATE contexts SET status = ?1, data = ?2, updated_at = ?3 WHERE context_id = ?4",
        params![
            serde_json::to_string(&context.status).unwrap_or_default(),
            data,
            context.updated_at.to_rfc3339(),
            context.context_id,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete(conn: &Connection, context_id: &str) -> CortexResult<()> {
    conn.execute("DELETE FROM contexts WHERE context_id = ?1", params![context_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_for_user(conn: &Connection, user_id: &str) -> CortexResult<usize> {
    conn.execute(
        "DELETE FROM contexts WHERE user_id = ?1 OR tenant_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
