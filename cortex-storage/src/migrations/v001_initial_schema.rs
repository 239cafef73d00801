//! v001: the seven collections of spec §3 plus the ambient audit log.

use rusqlite::Connection;

use cortex_core::errors::CortexResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS conversations (
            conversation_id   TEXT PRIMARY KEY,
            memory_space_id   TEXT NOT NULL,
            participant_id    TEXT,
            conversation_type TEXT NOT NULL,
            message_count     INTEGER NOT NULL DEFAULT 0,
            tenant_id         TEXT,
            data              TEXT NOT NULL,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_conversations_space ON conversations(memory_space_id);
        CREATE INDEX IF NOT EXISTS idx_conversations_participant ON conversations(participant_id);

        CREATE TABLE IF NOT EXISTS immutable_records (
            record_type TEXT NOT NULL,
            id          TEXT NOT NULL,
            version     INTEGER NOT NULL DEFAULT 1,
            user_id     TEXT,
            tenant_id   TEXT,
            data        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            PRIMARY KEY (record_type, id)
        );
        CREATE INDEX IF NOT EXISTS idx_immutable_user ON immutable_records(user_id);

        CREATE TABLE IF NOT EXISTS mutable_records (
            namespace         TEXT NOT NULL,
            key               TEXT NOT NULL,
            value             TEXT NOT NULL,
            concurrency_token INTEGER NOT NULL DEFAULT 0,
            user_id           TEXT,
            tenant_id         TEXT,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL,
            PRIMARY KEY (namespace, key)
        );

        CREATE TABLE IF NOT EXISTS memories (
            memory_id       TEXT PRIMARY KEY,
            memory_space_id TEXT NOT NULL,
            content         TEXT NOT NULL,
            content_type    TEXT NOT NULL,
            embedding       BLOB,
            source_type     TEXT NOT NULL,
            importance      INTEGER NOT NULL DEFAULT 50,
            version         INTEGER NOT NULL DEFAULT 1,
            access_count    INTEGER NOT NULL DEFAULT 0,
            user_id         TEXT,
            tenant_id       TEXT,
            data            TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_memories_space ON memories(memory_space_id);
        CREATE INDEX IF NOT EXISTS idx_memories_importance ON memories(importance);
        CREATE INDEX IF NOT EXISTS idx_memories_user ON memories(user_id);

        CREATE TABLE IF NOT EXISTS facts (
            fact_id         TEXT PRIMARY KEY,
            memory_space_id TEXT NOT NULL,
            user_id         TEXT,
            fact            TEXT NOT NULL,
            fact_type       TEXT NOT NULL,
            slot_key        TEXT NOT NULL,
            confidence      INTEGER NOT NULL DEFAULT 70,
            embedding       BLOB,
            version         INTEGER NOT NULL DEFAULT 1,
            superseded_by   TEXT,
            supersedes      TEXT,
            tenant_id       TEXT,
            data            TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_facts_space ON facts(memory_space_id);
        CREATE INDEX IF NOT EXISTS idx_facts_slot ON facts(memory_space_id, slot_key);
        CREATE INDEX IF NOT EXISTS idx_facts_active ON facts(memory_space_id, superseded_by);

        CREATE TABLE IF NOT EXISTS fact_history (
            id              TEXT PRIMARY KEY,
            fact_id         TEXT NOT NULL,
            memory_space_id TEXT NOT NULL,
            action          TEXT NOT NULL,
            data            TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_fact_history_fact ON fact_history(fact_id);

        CREATE TABLE IF NOT EXISTS graph_sync_queue (
            id              TEXT PRIMARY KEY,
            entity_table    TEXT NOT NULL,
            entity_id       TEXT NOT NULL,
            operation       TEXT NOT NULL,
            entity          TEXT,
            synced          INTEGER NOT NULL DEFAULT 0,
            failed_attempts INTEGER NOT NULL DEFAULT 0,
            last_error      TEXT,
            next_attempt_at TEXT NOT NULL,
            dead_lettered   INTEGER NOT NULL DEFAULT 0,
            priority        INTEGER,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_graphsync_pending
            ON graph_sync_queue(synced, dead_lettered, next_attempt_at);

        CREATE TABLE IF NOT EXISTS contexts (
            context_id      TEXT PRIMARY KEY,
            memory_space_id TEXT NOT NULL,
            parent_id       TEXT,
            root_id         TEXT NOT NULL,
            depth           INTEGER NOT NULL DEFAULT 0,
            status          TEXT NOT NULL,
            user_id         TEXT,
            tenant_id       TEXT,
            data            TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_contexts_parent ON contexts(parent_id);
        CREATE INDEX IF NOT EXISTS idx_contexts_root ON contexts(root_id);

        CREATE TABLE IF NOT EXISTS memory_spaces (
            memory_space_id TEXT PRIMARY KEY,
            space_type      TEXT NOT NULL,
            status          TEXT NOT NULL,
            tenant_id       TEXT,
            data            TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS audit_log (
            id          TEXT PRIMARY KEY,
            collection  TEXT NOT NULL,
            entity_id   TEXT NOT NULL,
            operation   TEXT NOT NULL,
            actor       TEXT NOT NULL,
            detail      TEXT NOT NULL DEFAULT '{}',
            timestamp   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_audit_entity ON audit_log(collection, entity_id);

        CREATE TABLE IF NOT EXISTS idempotency_keys (
            idempotency_key TEXT PRIMARY KEY,
            memory_id       TEXT,
            fact_id         TEXT,
            created_at      TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
