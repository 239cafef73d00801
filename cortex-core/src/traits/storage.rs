use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::CortexResult;
use crate::models::{
    AuditActor, AuditEntry, AuditOperation, Context, Conversation, Fact, FactHistoryEntry,
    GdprCascadeJob, GovernanceEnforcement, GraphSyncQueueEntry, GraphSyncOperation,
    ImmutableRecord, Memory, MemorySpace, Message, MutableRecord,
};

/// Conversations collection (spec §3, §4.2).
///
/// Method names are collection-qualified (`create_conversation`, not
/// `create`) because [`IStorageBackend`] implements every collection trait
/// on one concrete type: an unqualified `create`/`get`/`delete` would be
/// ambiguous the moment more than one of these traits is in scope at a
/// call site, which for `IStorageBackend` consumers is always.
#[async_trait]
pub trait IConversationStorage: Send + Sync {
    async fn create_conversation(&self, conversation: &Conversation) -> CortexResult<()>;
    async fn get_conversation(&self, conversation_id: &str) -> CortexResult<Option<Conversation>>;
    async fn append_message(
        &self,
        conversation_id: &str,
        message: &Message,
    ) -> CortexResult<()>;
    /// Append several messages as a single write (spec §4.6 step 1: the
    /// orchestrator's user+agent pair must land together).
    async fn append_messages(
        &self,
        conversation_id: &str,
        messages: &[Message],
    ) -> CortexResult<Vec<String>>;
    async fn list_conversations_by_participant(
        &self,
        participant_id: &str,
    ) -> CortexResult<Vec<Conversation>>;
    async fn delete_conversation(&self, conversation_id: &str) -> CortexResult<()>;
    /// GDPR cascade hook (spec §4.8): remove every row tied to `user_id`.
    /// Returns the number of rows deleted.
    async fn delete_conversations_for_user(&self, user_id: &str) -> CortexResult<usize>;
}

/// Immutable records collection: create-once, version-on-write (spec §3, §4.2).
#[async_trait]
pub trait IImmutableStorage: Send + Sync {
    async fn create_immutable(&self, record: &ImmutableRecord) -> CortexResult<()>;
    async fn get_immutable(&self, record_type: &str, id: &str) -> CortexResult<Option<ImmutableRecord>>;
    async fn get_immutable_version(
        &self,
        record_type: &str,
        id: &str,
        version: u64,
    ) -> CortexResult<Option<serde_json::Value>>;
    async fn store_new_version(
        &self,
        record_type: &str,
        id: &str,
        data: serde_json::Value,
        user_id: Option<&str>,
    ) -> CortexResult<u64>;
    async fn delete_immutable(&self, record_type: &str, id: &str) -> CortexResult<()>;
    async fn delete_immutable_for_user(&self, user_id: &str) -> CortexResult<usize>;
}

/// Mutable records collection: namespaced key/value with optimistic
/// concurrency (spec §3, §4.2).
#[async_trait]
pub trait IMutableStorage: Send + Sync {
    async fn get_mutable(&self, namespace: &str, key: &str) -> CortexResult<Option<MutableRecord>>;
    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: serde_json::Value,
        expected_token: Option<u64>,
        user_id: Option<&str>,
    ) -> CortexResult<u64>;
    async fn delete_mutable(&self, namespace: &str, key: &str) -> CortexResult<()>;
    async fn delete_mutable_for_user(&self, user_id: &str) -> CortexResult<usize>;
}

/// Memories collection: content + embedding + cross-references, with
/// bounded version history (spec §3, §4.2).
#[async_trait]
pub trait IMemoryStorage: Send + Sync {
    async fn create_memory(&self, memory: &Memory) -> CortexResult<()>;
    async fn create_memories_bulk(&self, memories: &[Memory]) -> CortexResult<usize>;
    async fn get_memory(&self, memory_id: &str) -> CortexResult<Option<Memory>>;
    async fn update_memory_content(
        &self,
        memory_id: &str,
        content: String,
        embedding: Vec<f32>,
        retention: usize,
    ) -> CortexResult<u64>;
    async fn record_memory_access(&self, memory_id: &str) -> CortexResult<()>;
    async fn delete_memory(&self, memory_id: &str) -> CortexResult<()>;
    async fn list_memories_by_space(&self, memory_space_id: &str) -> CortexResult<Vec<Memory>>;
    async fn search_memory_vector(
        &self,
        memory_space_id: &str,
        embedding: &[f32],
        limit: usize,
    ) -> CortexResult<Vec<(Memory, f64)>>;
    async fn delete_memories_for_user(&self, user_id: &str) -> CortexResult<usize>;
}

/// Facts collection: canonical belief store (spec §3, §4.3, §4.4).
#[async_trait]
pub trait IFactStorage: Send + Sync {
    async fn create_fact(&self, fact: &Fact) -> CortexResult<()>;
    async fn get_fact(&self, fact_id: &str) -> CortexResult<Option<Fact>>;
    async fn find_facts_by_slot_key(
        &self,
        memory_space_id: &str,
        slot_key: &str,
    ) -> CortexResult<Vec<Fact>>;
    async fn search_fact_candidates(
        &self,
        memory_space_id: &str,
        embedding: &[f32],
        limit: usize,
    ) -> CortexResult<Vec<(Fact, f64)>>;
    async fn update_fact(&self, fact: &Fact) -> CortexResult<()>;
    async fn supersede(&self, old_fact_id: &str, new_fact_id: &str) -> CortexResult<()>;
    async fn list_facts_by_space(
        &self,
        memory_space_id: &str,
        include_superseded: bool,
    ) -> CortexResult<Vec<Fact>>;
    async fn delete_fact(&self, fact_id: &str) -> CortexResult<()>;
    async fn delete_facts_for_user(&self, user_id: &str) -> CortexResult<usize>;
}

/// Fact history: append-only audit trail of belief revision decisions
/// (spec §3, §4.4).
#[async_trait]
pub trait IFactHistoryStorage: Send + Sync {
    async fn append(&self, entry: &FactHistoryEntry) -> CortexResult<()>;
    async fn list_for_fact(&self, fact_id: &str) -> CortexResult<Vec<FactHistoryEntry>>;
    /// GDPR cascade hook (spec §4.8). Returns the number of rows deleted.
    async fn delete_for_user(&self, user_id: &str) -> CortexResult<usize>;
}

/// Graph sync queue: durable outbox drained by the graph sync worker
/// (spec §3, §4.7).
#[async_trait]
pub trait IGraphSyncQueueStorage: Send + Sync {
    async fn enqueue(
        &self,
        table: &str,
        entity_id: &str,
        operation: GraphSyncOperation,
        entity: serde_json::Value,
        priority: Option<u8>,
    ) -> CortexResult<String>;
    async fn claim_batch(&self, limit: usize) -> CortexResult<Vec<GraphSyncQueueEntry>>;
    async fn mark_synced(&self, id: &str) -> CortexResult<()>;
    async fn mark_failed(
        &self,
        id: &str,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> CortexResult<()>;
    async fn mark_dead_lettered(&self, id: &str, error: &str) -> CortexResult<()>;
    async fn reap_synced(&self, older_than: DateTime<Utc>) -> CortexResult<usize>;
}

/// Contexts collection: hierarchical work sessions (spec §3, §4.2).
#[async_trait]
pub trait IContextStorage: Send + Sync {
    async fn create_context(&self, context: &Context) -> CortexResult<()>;
    async fn get_context(&self, context_id: &str) -> CortexResult<Option<Context>>;
    async fn list_children(&self, parent_id: &str) -> CortexResult<Vec<Context>>;
    async fn update_context(&self, context: &Context) -> CortexResult<()>;
    async fn delete_context(&self, context_id: &str) -> CortexResult<()>;
    async fn delete_contexts_for_user(&self, user_id: &str) -> CortexResult<usize>;
}

/// Memory spaces collection (spec §3).
#[async_trait]
pub trait IMemorySpaceStorage: Send + Sync {
    async fn create_memory_space(&self, space: &MemorySpace) -> CortexResult<()>;
    async fn get_memory_space(&self, memory_space_id: &str) -> CortexResult<Option<MemorySpace>>;
    async fn list_memory_spaces_for_participant(
        &self,
        participant_id: &str,
    ) -> CortexResult<Vec<MemorySpace>>;
    async fn archive(&self, memory_space_id: &str) -> CortexResult<()>;
}

/// Generalized audit log, distinct from the mandatory `factHistory`
/// collection: every collection's create/update/archive/delete passes
/// through here for governance and debugging (spec §9 ambient addition).
#[async_trait]
pub trait IAuditStorage: Send + Sync {
    async fn record(
        &self,
        collection: &str,
        entity_id: &str,
        operation: AuditOperation,
        actor: AuditActor,
        detail: Option<serde_json::Value>,
    ) -> CortexResult<()>;
    async fn list_for_entity(&self, collection: &str, entity_id: &str) -> CortexResult<Vec<AuditEntry>>;
}

/// Governance bookkeeping: retention-enforcement records and the resumable
/// GDPR cascade work queue (spec §4.8, C8).
#[async_trait]
pub trait IGovernanceStorage: Send + Sync {
    async fn record_enforcement(&self, entry: &GovernanceEnforcement) -> CortexResult<()>;
    /// The most recent in-flight cascade job for a user, if a prior run
    /// was interrupted before finishing every collection.
    async fn get_cascade_job(&self, user_id: &str) -> CortexResult<Option<GdprCascadeJob>>;
    async fn create_cascade_job(&self, job: &GdprCascadeJob) -> CortexResult<()>;
    async fn update_cascade_job(&self, job: &GdprCascadeJob) -> CortexResult<()>;
    async fn delete_cascade_job(&self, id: &str) -> CortexResult<()>;
}

/// Union of every per-collection storage trait, implemented once by the
/// concrete backend (spec §6: "a document-store contract any backend
/// can satisfy").
#[async_trait]
pub trait IStorageBackend:
    IConversationStorage
    + IImmutableStorage
    + IMutableStorage
    + IMemoryStorage
    + IFactStorage
    + IFactHistoryStorage
    + IGraphSyncQueueStorage
    + IContextStorage
    + IMemorySpaceStorage
    + IAuditStorage
    + IGovernanceStorage
{
    /// Run pending migrations, creating the schema on first use.
    async fn migrate(&self) -> CortexResult<()>;

    /// Reclaim space and rebuild indexes; a no-op for backends that
    /// don't need it.
    async fn vacuum(&self) -> CortexResult<()>;
}
