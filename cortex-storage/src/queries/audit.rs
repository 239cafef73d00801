use rusqlite::{params, Connection};

use cortex_core::errors::CortexResult;
use cortex_core::models::{AuditActor, AuditEntry, AuditOperation};
use cortex_core::models::ids::new_id;

use crate::to_storage_err;

pub fn record(
    conn: &Connection,
    collection: &str,
    entity_id: &str,
    operation: AuditOperation,
    actor: AuditActor,
    detail: Option<serde_json::Value>,
) -> CortexResult<()> {
    let entry = AuditEntry {
        id: new_id(),
        collection: collection.to_string(),
        entity_id: entity_id.to_string(),
        operation,
        actor,
        detail: detail.unwrap_or(serde_json::Value::Null),
        timestamp: chrono::Utc::now(),
    };
    conn.execute(
        "INSERT INTO audit_log (id, collection, entity_id, operation, actor, detail, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id,
            entry.collection,
            entry.entity_id,
            serde_json::to_string(&entry.operation).unwrap_or_default(),
            serde_json::to_string(&entry.actor).unwrap_or_default(),
            serde_json::to_string(&entry.detail).unwrap_or_default(),
            entry.timestamp.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_for_entity(conn: &Connection, collection: &str, entity_id: &str) -> CortexResult<Vec<AuditEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, collection, entity_id, operation, actor, detail, timestamp
             FROM audit_log WHERE collection = ?1 AND entity_id = ?2 ORDER BY timestamp ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![collection, entity_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, collection, entity_id, operation, actor, detail, timestamp) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(AuditEntry {
            id,
            collection,
            entity_id,
            operation: serde_json::from_str(&operation).map_err(|e| to_storage_err(e.to_string()))?,
            actor: serde_json::from_str(&actor).map_err(|e| to_storage_err(e.to_string()))?,
            detail: serde_json::from_str(&detail).map_err(|e| to_storage_err(e.to_string()))?,
            timestamp: timestamp.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
        });
    }
    Ok(out)
}
