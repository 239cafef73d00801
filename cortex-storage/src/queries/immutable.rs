use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::constants::DEFAULT_IMMUTABLE_VERSION_RETENTION;
use cortex_core::errors::CortexResult;
use cortex_core::models::ImmutableRecord;

use crate::to_storage_err;

pub fn create(conn: &Connection, record: &ImmutableRecord) -> CortexResult<()> {
    let data = serde_json::to_string(record).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO immutable_records (record_type, id, version, user_id, tenant_id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.record_type,
            record.id,
            record.version as i64,
            record.user_id,
            record.tenant_id,
            data,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get(conn: &Connection, record_type: &str, id: &str) -> CortexResult<Option<ImmutableRecord>> {
    conn.query_row(
        "SELECT data FROM immutable_records WHERE record_type = ?1 AND id = ?2",
        params![record_type, id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(|data| serde_json::from_str(&data).map_err(|e| to_storage_err(e.to_string())))
    .transpose()
}

pub fn get_version(
    conn: &Connection,
    record_type: &str,
    id: &str,
    version: u64,
) -> CortexResult<Option<serde_json::Value>> {
    let Some(record) = get(conn, record_type, id)? else {
        return Ok(None);
    };
    Ok(record.get_version(version))
}

/// Append a new version, snapshotting the old data (spec §4.2 versioning
/// contract). Returns the new version number.
pub fn store_new_version(
    conn: &Connection,
    record_type: &str,
    id: &str,
    data: serde_json::Value,
    user_id: Option<&str>,
) -> CortexResult<u64> {
    let mut record = get(conn, record_type, id)?
        .unwrap_or_else(|| ImmutableRecord::new(record_type, id, serde_json::Value::Null));
    if record.user_id.is_none() {
        record.user_id = user_id.map(str::to_string);
    }
    record.store(data, DEFAULT_IMMUTABLE_VERSION_RETENTION);

    let json = serde_json::to_string(&record).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO immutable_records (record_type, id, version, user_id, tenant_id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(record_type, id) DO UPDATE SET
            version = excluded.version, user_id = excluded.user_id, data = excluded.data, updated_at = excluded.updated_at",
        params![
            record.record_type,
            record.id,
            record.version as i64,
            record.user_id,
            record.tenant_id,
            json,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(record.version)
}

pub fn delete(conn: &Connection, record_type: &str, id: &str) -> CortexResult<()> {
    conn.execute(
        "DELETE FROM immutable_records WHERE record_type = ?1 AND id = ?2",
        params![record_type, id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_for_user(conn: &Connection, user_id: &str) -> CortexResult<usize> {
    conn.execute(
        "DELETE FROM immutable_records WHERE user_id = ?1 OR tenant_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
