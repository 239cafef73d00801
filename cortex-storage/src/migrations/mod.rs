//! Versioned migrations, one file per version, applied in order and
//! tracked in `schema_version` so `run_migrations` is idempotent on an
//! already-current database.

mod v001_initial_schema;
mod v002_governance_schema;

use rusqlite::Connection;

use cortex_core::errors::{CortexResult, StorageError};

use crate::to_storage_err;

const MIGRATIONS: &[(u32, fn(&Connection) -> CortexResult<()>)] = &[
    (1, v001_initial_schema::migrate),
    (2, v002_governance_schema::migrate),
];

pub fn run_migrations(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}
