use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::{CortexResult, StorageError};
use cortex_core::models::MutableRecord;

use crate::to_storage_err;

pub fn get(conn: &Connection, namespace: &str, key: &str) -> CortexResult<Option<MutableRecord>> {
    conn.query_row(
        "SELECT value, concurrency_token, user_id, tenant_id, created_at, updated_at
         FROM mutable_records WHERE namespace = ?1 AND key = ?2",
        params![namespace, key],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(|(value, token, user_id, tenant_id, created_at, updated_at)| {
        Ok(MutableRecord {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: serde_json::from_str(&value).map_err(|e| to_storage_err(e.to_string()))?,
            user_id,
            concurrency_token: token as u64,
            tenant_id,
            created_at: created_at.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
            updated_at: updated_at.parse().map_err(|e: chrono::ParseError| to_storage_err(e.to_string()))?,
        })
    })
    .transpose()
}

/// Compare-and-swap write. `expected_token` must match the row's current
/// `concurrency_token`, or `None` to require the key be absent (create).
/// Returns the new token (spec §4.2, optimistic concurrency).
pub fn put(
    conn: &Connection,
    namespace: &str,
    key: &str,
    value: serde_json::Value,
    expected_token: Option<u64>,
    user_id: Option<&str>,
) -> CortexResult<u64> {
    let existing = get(conn, namespace, key)?;
    let value_json = serde_json::to_string(&value).map_err(|e| to_storage_err(e.to_string()))?;
    let now = chrono::Utc::now().to_rfc3339();

    match (existing, expected_token) {
        (None, None) => {
            conn.execute(
                "INSERT INTO mutable_records
                    (namespace, key, value, concurrency_token, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 1, ?4, ?5, ?5)",
                params![namespace, key, value_json, user_id, now],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(1)
        }
        (None, Some(_)) => Err(StorageError::NotFound {
            collection: "mutable".to_string(),
            id: format!("{namespace}/{key}"),
        }
        .into()),
        (Some(current), Some(expected)) if current.concurrency_token == expected => {
            let new_token = current.concurrency_token + 1;
            conn.execute(
                "UPDATE mutable_records SET value = ?1, concurrency_token = ?2, updated_at = ?3
                 WHERE namespace = ?4 AND key = ?5",
                params![value_json, new_token as i64, now, namespace, key],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(new_token)
        }
        (Some(_), _) => Err(StorageError::Conflict {
            collection: "mutable".to_string(),
            id: format!("{namespace}/{key}"),
            attempts: 1,
        }
        .into()),
    }
}

pub fn delete(conn: &Connection, namespace: &str, key: &str) -> CortexResult<()> {
    conn.execute(
        "DELETE FROM mutable_records WHERE namespace = ?1 AND key = ?2",
        params![namespace, key],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_for_user(conn: &Connection, user_id: &str) -> CortexResult<usize> {
    conn.execute(
        "DELETE FROM mutable_records WHERE user_id = ?1 OR tenant_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
