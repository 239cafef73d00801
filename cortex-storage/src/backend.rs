//! [`IStorageBackend`] implemented against the SQLite connection pool.
//!
//! Every method wraps a synchronous `queries::*` call in
//! `tokio::task::spawn_blocking` so the async trait boundary never blocks a
//! tokio worker thread on file I/O.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::models::{
    AuditActor, AuditEntry, AuditOperation, Context, Conversation, Fact, FactHistoryEntry,
    GdprCascadeJob, GovernanceEnforcement, GraphSyncOperation, GraphSyncQueueEntry, Memory,
    MemorySpace, Message, MutableRecord,
};
use cortex_core::traits::{
    IAuditStorage, IContextStorage, IConversationStorage, IFactHistoryStorage, IFactStorage,
    IGovernanceStorage, IGraphSyncQueueStorage, IImmutableStorage, IMemorySpaceStorage,
    IMemoryStorage, IMutableStorage, IStorageBackend,
};

use crate::migrations::run_migrations;
use crate::pool::{pragmas::apply_pragmas, ConnectionPool};
use crate::queries;
use crate::to_storage_err;

/// `spawn_blocking` panics propagate as join errors; fold them into the same
/// backend error the rest of this module returns.
fn join_err(err: tokio::task::JoinError) -> CortexError {
    to_storage_err(format!("blocking task panicked: {err}"))
}

/// SQLite-backed [`IStorageBackend`], grounded on the teacher's split
/// writer/reader pool.
pub struct SqliteBackend {
    pool: Arc<ConnectionPool>,
}

impl SqliteBackend {
    pub fn open(path: &Path, read_pool_size: usize) -> CortexResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn open_in_memory(read_pool_size: usize) -> CortexResult<Self> {
        let pool = ConnectionPool::open_in_memory(read_pool_size)?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

macro_rules! write_blocking {
    ($self:expr, $f:expr) => {{
        let pool = Arc::clone(&$self.pool);
        tokio::task::spawn_blocking(move || pool.writer.with_conn_sync($f))
            .await
            .map_err(join_err)?
    }};
}

macro_rules! read_blocking {
    ($self:expr, $f:expr) => {{
        let pool = Arc::clone(&$self.pool);
        tokio::task::spawn_blocking(move || pool.readers.with_conn($f))
            .await
            .map_err(join_err)?
    }};
}

#[async_trait]
impl IConversationStorage for SqliteBackend {
    async fn create_conversation(&self, conversation: &Conversation) -> CortexResult<()> {
        let conversation = conversation.clone();
        write_blocking!(self, move |conn| queries::conversations::create(conn, &conversation))
    }

    async fn get_conversation(&self, conversation_id: &str) -> CortexResult<Option<Conversation>> {
        let id = conversation_id.to_string();
        read_blocking!(self, move |conn| queries::conversations::get(conn, &id))
    }

    async fn append_message(&self, conversation_id: &str, message: &Message) -> CortexResult<()> {
        let id = conversation_id.to_string();
        let message = message.clone();
        write_blocking!(self, move |conn| queries::conversations::append_message(conn, &id, &message))
    }

    async fn append_messages(&self, conversation_id: &str, messages: &[Message]) -> CortexResult<Vec<String>> {
        let id = conversation_id.to_string();
        let messages = messages.to_vec();
        write_blocking!(self, move |conn| queries::conversations::append_messages(conn, &id, &messages))
    }

    async fn list_conversations_by_participant(&self, participant_id: &str) -> CortexResult<Vec<Conversation>> {
        let id = participant_id.to_string();
        read_blocking!(self, move |conn| queries::conversations::list_by_participant(conn, &id))
    }

    async fn delete_conversation(&self, conversation_id: &str) -> CortexResult<()> {
        let id = conversation_id.to_string();
        write_blocking!(self, move |conn| queries::conversations::delete(conn, &id))
    }

    async fn delete_conversations_for_user(&self, user_id: &str) -> CortexResult<usize> {
        let id = user_id.to_string();
        write_blocking!(self, move |conn| queries::conversations::delete_for_user(conn, &id))
    }
}

#[async_trait]
impl IImmutableStorage for SqliteBackend {
    async fn create_immutable(&self, record: &cortex_core::models::ImmutableRecord) -> CortexResult<()> {
        let record = record.clone();
        write_blocking!(self, move |conn| queries::immutable::create(conn, &record))
    }

    async fn get_immutable(&self, record_type: &str, id: &str) -> CortexResult<Option<cortex_core::models::ImmutableRecord>> {
        let (record_type, id) = (record_type.to_string(), id.to_string());
        read_blocking!(self, move |conn| queries::immutable::get(conn, &record_type, &id))
    }

    async fn get_immutable_version(&self, record_type: &str, id: &str, version: u64) -> CortexResult<Option<serde_json::Value>> {
        let (record_type, id) = (record_type.to_string(), id.to_string());
        read_blocking!(self, move |conn| queries::immutable::get_version(conn, &record_type, &id, version))
    }

    async fn store_new_version(
        &self,
        record_type: &str,
        id: &str,
        data: serde_json::Value,
        user_id: Option<&str>,
    ) -> CortexResult<u64> {
        let (record_type, id, user_id) = (record_type.to_string(), id.to_string(), user_id.map(str::to_string));
        write_blocking!(self, move |conn| {
            queries::immutable::store_new_version(conn, &record_type, &id, data, user_id.as_deref())
        })
    }

    async fn delete_immutable(&self, record_type: &str, id: &str) -> CortexResult<()> {
        let (record_type, id) = (record_type.to_string(), id.to_string());
        write_blocking!(self, move |conn| queries::immutable::delete(conn, &record_type, &id))
    }

    async fn delete_immutable_for_user(&self, user_id: &str) -> CortexResult<usize> {
        let id = user_id.to_string();
        write_blocking!(self, move |conn| queries::immutable::delete_for_user(conn, &id))
    }
}

#[async_trait]
impl IMutableStorage for SqliteBackend {
    async fn get_mutable(&self, namespace: &str, key: &str) -> CortexResult<Option<MutableRecord>> {
        let (namespace, key) = (namespace.to_string(), key.to_string());
        read_blocking!(self, move |conn| queries::mutable::get(conn, &namespace, &key))
    }

    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: serde_json::Value,
        expected_token: Option<u64>,
        user_id: Option<&str>,
    ) -> CortexResult<u64> {
        let (namespace, key, user_id) = (namespace.to_string(), key.to_string(), user_id.map(str::to_string));
        write_blocking!(self, move |conn| {
            queries::mutable::put(conn, &namespace, &key, value, expected_token, user_id.as_deref())
        })
    }

    async fn delete_mutable(&self, namespace: &str, key: &str) -> CortexResult<()> {
        let (namespace, key) = (namespace.to_string(), key.to_string());
        write_blocking!(self, move |conn| queries::mutable::delete(conn, &namespace, &key))
    }

    async fn delete_mutable_for_user(&self, user_id: &str) -> CortexResult<usize> {
        let id = user_id.to_string();
        write_blocking!(self, move |conn| queries::mutable::delete_for_user(conn, &id))
    }
}

#[async_trait]
impl IMemoryStorage for SqliteBackend {
    async fn create_memory(&self, memory: &Memory) -> CortexResult<()> {
        let memory = memory.clone();
        write_blocking!(self, move |conn| queries::memories::create(conn, &memory))
    }

    async fn create_memories_bulk(&self, memories: &[Memory]) -> CortexResult<usize> {
        let memories = memories.to_vec();
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            pool.writer.with_conn_mut(|conn| queries::memories::create_bulk(conn, &memories))
        })
        .await
        .map_err(join_err)?
    }

    async fn get_memory(&self, memory_id: &str) -> CortexResult<Option<Memory>> {
        let id = memory_id.to_string();
        read_blocking!(self, move |conn| queries::memories::get(conn, &id))
    }

    async fn update_memory_content(&self, memory_id: &str, content: String, embedding: Vec<f32>, retention: usize) -> CortexResult<u64> {
        let id = memory_id.to_string();
        write_blocking!(self, move |conn| {
            queries::memories::update_content(conn, &id, content, embedding, retention)
        })
    }

    async fn record_memory_access(&self, memory_id: &str) -> CortexResult<()> {
        let id = memory_id.to_string();
        write_blocking!(self, move |conn| queries::memories::record_access(conn, &id))
    }

    async fn delete_memory(&self, memory_id: &str) -> CortexResult<()> {
        let id = memory_id.to_string();
        write_blocking!(self, move |conn| queries::memories::delete(conn, &id))
    }

    async fn list_memories_by_space(&self, memory_space_id: &str) -> CortexResult<Vec<Memory>> {
        let id = memory_space_id.to_string();
        read_blocking!(self, move |conn| queries::memories::list_by_space(conn, &id))
    }

    async fn search_memory_vector(&self, memory_space_id: &str, embedding: &[f32], limit: usize) -> CortexResult<Vec<(Memory, f64)>> {
        let id = memory_space_id.to_string();
        let embedding = embedding.to_vec();
        read_blocking!(self, move |conn| queries::memories::search_vector(conn, &id, &embedding, limit))
    }

    async fn delete_memories_for_user(&self, user_id: &str) -> CortexResult<usize> {
        let id = user_id.to_string();
        write_blocking!(self, move |conn| queries::memories::delete_for_user(conn, &id))
    }
}

#[async_trait]
impl IFactStorage for SqliteBackend {
    async fn create_fact(&self, fact: &Fact) -> CortexResult<()> {
        let fact = fact.clone();
        write_blocking!(self, move |conn| queries::facts::create(conn, &fact))
    }

    async fn get_fact(&self, fact_id: &str) -> CortexResult<Option<Fact>> {
        let id = fact_id.to_string();
        read_blocking!(self, move |conn| queries::facts::get(conn, &id))
    }

    async fn find_facts_by_slot_key(&self, memory_space_id: &str, slot_key: &str) -> CortexResult<Vec<Fact>> {
        let (space, slot) = (memory_space_id.to_string(), slot_key.to_string());
        read_blocking!(self, move |conn| queries::facts::find_by_slot_key(conn, &space, &slot))
    }

    async fn search_fact_candidates(&self, memory_space_id: &str, embedding: &[f32], limit: usize) -> CortexResult<Vec<(Fact, f64)>> {
        let space = memory_space_id.to_string();
        let embedding = embedding.to_vec();
        read_blocking!(self, move |conn| queries::facts::search_candidates(conn, &space, &embedding, limit))
    }

    async fn update_fact(&self, fact: &Fact) -> CortexResult<()> {
        let fact = fact.clone();
        write_blocking!(self, move |conn| queries::facts::update(conn, &fact))
    }

    async fn supersede(&self, old_fact_id: &str, new_fact_id: &str) -> CortexResult<()> {
        let (old_id, new_id) = (old_fact_id.to_string(), new_fact_id.to_string());
        write_blocking!(self, move |conn| queries::facts::supersede(conn, &old_id, &new_id))
    }

    async fn list_facts_by_space(&self, memory_space_id: &str, include_superseded: bool) -> CortexResult<Vec<Fact>> {
        let space = memory_space_id.to_string();
        read_blocking!(self, move |conn| queries::facts::list_by_space(conn, &space, include_superseded))
    }

    async fn delete_fact(&self, fact_id: &str) -> CortexResult<()> {
        let id = fact_id.to_string();
        write_blocking!(self, move |conn| queries::facts::delete(conn, &id))
    }

    async fn delete_facts_for_user(&self, user_id: &str) -> CortexResult<usize> {
        let id = user_id.to_string();
        write_blocking!(self, move |conn| queries::facts::delete_for_user(conn, &id))
    }
}

#[async_trait]
impl IFactHistoryStorage for SqliteBackend {
    async fn append(&self, entry: &FactHistoryEntry) -> CortexResult<()> {
        let entry = entry.clone();
        write_blocking!(self, move |conn| queries::fact_history::append(conn, &entry))
    }

    async fn list_for_fact(&self, fact_id: &str) -> CortexResult<Vec<FactHistoryEntry>> {
        let id = fact_id.to_string();
        read_blocking!(self, move |conn| queries::fact_history::list_for_fact(conn, &id))
    }

    async fn delete_for_user(&self, user_id: &str) -> CortexResult<usize> {
        let id = user_id.to_string();
        write_blocking!(self, move |conn| queries::fact_history::delete_for_user(conn, &id))
    }
}

#[async_trait]
impl IGovernanceStorage for SqliteBackend {
    async fn record_enforcement(&self, entry: &GovernanceEnforcement) -> CortexResult<()> {
        let entry = entry.clone();
        write_blocking!(self, move |conn| queries::governance::record_enforcement(conn, &entry))
    }

    async fn get_cascade_job(&self, user_id: &str) -> CortexResult<Option<GdprCascadeJob>> {
        let id = user_id.to_string();
        read_blocking!(self, move |conn| queries::governance::get_cascade_job(conn, &id))
    }

    async fn create_cascade_job(&self, job: &GdprCascadeJob) -> CortexResult<()> {
        let job = job.clone();
        write_blocking!(self, move |conn| queries::governance::create_cascade_job(conn, &job))
    }

    async fn update_cascade_job(&self, job: &GdprCascadeJob) -> CortexResult<()> {
        let job = job.clone();
        write_blocking!(self, move |conn| queries::governance::update_cascade_job(conn, &job))
    }

    async fn delete_cascade_job(&self, id: &str) -> CortexResult<()> {
        let id = id.to_string();
        write_blocking!(self, move |conn| queries::governance::delete_cascade_job(conn, &id))
    }
}

#[async_trait]
impl IGraphSyncQueueStorage for SqliteBackend {
    async fn enqueue(
        &self,
        table: &str,
        entity_id: &str,
        operation: GraphSyncOperation,
        entity: serde_json::Value,
        priority: Option<u8>,
    ) -> CortexResult<String> {
        let (table, entity_id) = (table.to_string(), entity_id.to_string());
        write_blocking!(self, move |conn| {
            queries::graph_sync_queue::enqueue(conn, &table, &entity_id, operation, entity, priority)
        })
    }

    async fn claim_batch(&self, limit: usize) -> CortexResult<Vec<GraphSyncQueueEntry>> {
        write_blocking!(self, move |conn| queries::graph_sync_queue::claim_batch(conn, limit))
    }

    async fn mark_synced(&self, id: &str) -> CortexResult<()> {
        let id = id.to_string();
        write_blocking!(self, move |conn| queries::graph_sync_queue::mark_synced(conn, &id))
    }

    async fn mark_failed(&self, id: &str, error: &str, next_attempt_at: DateTime<Utc>) -> CortexResult<()> {
        let (id, error) = (id.to_string(), error.to_string());
        write_blocking!(self, move |conn| {
            queries::graph_sync_queue::mark_failed(conn, &id, &error, next_attempt_at)
        })
    }

    async fn mark_dead_lettered(&self, id: &str, error: &str) -> CortexResult<()> {
        let (id, error) = (id.to_string(), error.to_string());
        write_blocking!(self, move |conn| queries::graph_sync_queue::mark_dead_lettered(conn, &id, &error))
    }

    async fn reap_synced(&self, older_than: DateTime<Utc>) -> CortexResult<usize> {
        write_blocking!(self, move |conn| queries::graph_sync_queue::reap_synced(conn, older_than))
    }
}

#[async_trait]
impl IContextStorage for SqliteBackend {
    async fn create_context(&self, context: &Context) -> CortexResult<()> {
        let context = context.clone();
        write_blocking!(self, move |conn| queries::contexts::create(conn, &context))
    }

    async fn get_context(&self, context_id: &str) -> CortexResult<Option<Context>> {
        let id = context_id.to_string();
        read_blocking!(self, move |conn| queries::contexts::get(conn, &id))
    }

    async fn list_children(&self, parent_id: &str) -> CortexResult<Vec<Context>> {
        let id = parent_id.to_string();
        read_blocking!(self, move |conn| queries::contexts::list_children(conn, &id))
    }

    async fn update_context(&self, context: &Context) -> CortexResult<()> {
        let context = context.clone();
        write_blocking!(self, move |conn| queries::contexts::update(conn, &context))
    }

    async fn delete_context(&self, context_id: &str) -> CortexResult<()> {
        let id = context_id.to_string();
        write_blocking!(self, move |conn| queries::contexts::delete(conn, &id))
    }

    async fn delete_contexts_for_user(&self, user_id: &str) -> CortexResult<usize> {
        let id = user_id.to_string();
        write_blocking!(self, move |conn| queries::contexts::delete_for_user(conn, &id))
    }
}

#[async_trait]
impl IMemorySpaceStorage for SqliteBackend {
    async fn create_memory_space(&self, space: &MemorySpace) -> CortexResult<()> {
        let space = space.clone();
        write_blocking!(self, move |conn| queries::memory_spaces::create(conn, &space))
    }

    async fn get_memory_space(&self, memory_space_id: &str) -> CortexResult<Option<MemorySpace>> {
        let id = memory_space_id.to_string();
        read_blocking!(self, move |conn| queries::memory_spaces::get(conn, &id))
    }

    async fn list_memory_spaces_for_participant(&self, participant_id: &str) -> CortexResult<Vec<MemorySpace>> {
        let id = participant_id.to_string();
        read_blocking!(self, move |conn| queries::memory_spaces::list_for_participant(conn, &id))
    }

    async fn archive(&self, memory_space_id: &str) -> CortexResult<()> {
        let id = memory_space_id.to_string();
        write_blocking!(self, move |conn| queries::memory_spaces::archive(conn, &id))
    }
}

#[async_trait]
impl IAuditStorage for SqliteBackend {
    async fn record(
        &self,
        collection: &str,
        entity_id: &str,
        operation: AuditOperation,
        actor: AuditActor,
        detail: Option<serde_json::Value>,
    ) -> CortexResult<()> {
        let (collection, entity_id) = (collection.to_string(), entity_id.to_string());
        write_blocking!(self, move |conn| {
            queries::audit::record(conn, &collection, &entity_id, operation, actor, detail)
        })
    }

    async fn list_for_entity(&self, collection: &str, entity_id: &str) -> CortexResult<Vec<AuditEntry>> {
        let (collection, entity_id) = (collection.to_string(), entity_id.to_string());
        read_blocking!(self, move |conn| queries::audit::list_for_entity(conn, &collection, &entity_id))
    }
}

#[async_trait]
impl IStorageBackend for SqliteBackend {
    async fn migrate(&self) -> CortexResult<()> {
        write_blocking!(self, move |conn| run_migrations(conn))
    }

    async fn vacuum(&self) -> CortexResult<()> {
        write_blocking!(self, move |conn| {
            conn.execute_batch("PRAGMA incremental_vacuum; ANALYZE;")
                .map_err(|e| to_storage_err(e.to_string()))
        })
    }
}

/// Re-applied on every fresh connection by [`crate::pool`]; exposed here so
/// callers can verify WAL mode without reaching into `pool` directly.
pub fn reapply_pragmas(conn: &rusqlite::Connection) -> CortexResult<()> {
    apply_pragmas(conn)
}
