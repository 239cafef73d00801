//! v002: governance bookkeeping (spec §4.8, C8) — retention-enforcement
//! records, the resumable GDPR cascade queue, and a `user_id` column on
//! `fact_history` so cascade deletes can target it directly.

use rusqlite::Connection;

use cortex_core::errors::CortexResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        ALTER TABLE fact_history ADD COLUMN user_id TEXT;
        CREATE INDEX IF NOT EXISTS idx_fact_history_user ON fact_history(user_id);

        CREATE TABLE IF NOT EXISTS governance_enforcement_log (
            id                  TEXT PRIMARY KEY,
            memory_space_id     TEXT NOT NULL,
            collection          TEXT NOT NULL,
            versions_deleted    INTEGER NOT NULL DEFAULT 0,
            records_purged      INTEGER NOT NULL DEFAULT 0,
            storage_freed_bytes INTEGER NOT NULL DEFAULT 0,
            enforced_at         TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_governance_enforcement_space
            ON governance_enforcement_log(memory_space_id);

        CREATE TABLE IF NOT EXISTS gdpr_cascade_jobs (
            id                  TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL,
            pending_collections TEXT NOT NULL,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_gdpr_cascade_user ON gdpr_cascade_jobs(user_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
