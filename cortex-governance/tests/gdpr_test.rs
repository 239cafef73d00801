//! GDPR cascade (spec §4.8): deletes every record keyed by a user across
//! collections, and resumes cleanly if the work queue still has entries
//! from an interrupted run.

use std::sync::Arc;

use async_trait::async_trait;
use cortex_core::config::ResilienceConfig;
use cortex_core::errors::CortexResult;
use cortex_core::models::{
    ContentType, Conversation, ConversationType, Fact, FactType, GdprCascadeJob, Memory, Message,
    MessageRole, SourceType,
};
use cortex_core::traits::{
    GraphNode, IConversationStorage, IFactStorage, IGovernanceStorage, IGraphAdapter,
    IMemoryStorage, IStorageBackend,
};
use cortex_governance::GdprCascade;
use cortex_resilience::ResilienceEnvelope;
use cortex_storage::SqliteBackend;

struct UnusedGraphAdapter;

#[async_trait]
impl IGraphAdapter for UnusedGraphAdapter {
    async fn connect(&self) -> CortexResult<()> {
        unreachable!()
    }
    async fn disconnect(&self) -> CortexResult<()> {
        unreachable!()
    }
    async fn upsert_node(&self, _label: &str, _props: serde_json::Value) -> CortexResult<String> {
        unreachable!()
    }
    async fn update_node(&self, _id: &str, _props: serde_json::Value) -> CortexResult<()> {
        unreachable!()
    }
    async fn delete_node(&self, _id: &str, _cleanup_orphans: bool) -> CortexResult<()> {
        unreachable!()
    }
    async fn find_nodes(&self, _label: &str, _filter: serde_json::Value, _limit: usize) -> CortexResult<Vec<GraphNode>> {
        unreachable!()
    }
    async fn relate(&self, _from: &str, _rel_type: &str, _to: &str, _props: Option<serde_json::Value>) -> CortexResult<()> {
        unreachable!()
    }
    async fn unrelate(&self, _from: &str, _rel_type: &str, _to: &str) -> CortexResult<()> {
        unreachable!()
    }
    async fn query(&self, _cypher_like: &str, _params: serde_json::Value) -> CortexResult<Vec<GraphNode>> {
        unreachable!()
    }
}

async fn backend() -> (Arc<SqliteBackend>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = Arc::new(SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open"));
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

#[tokio::test]
async fn cascade_deletes_every_collection_for_the_user() {
    let (backend, _dir) = backend().await;

    let mut conversation = Conversation::new("space-1", ConversationType::UserAgent);
    conversation.participant_id = Some("user-1".to_string());
    backend.create_conversation(&conversation).await.expect("create conversation");
    let message = Message::new(MessageRole::User, "hi");
    backend.append_message(&conversation.conversation_id, &message).await.expect("append");

    let mut memory = Memory::new("space-1", "hi", ContentType::Raw, SourceType::Conversation);
    memory.user_id = Some("user-1".to_string());
    backend.create_memory(&memory).await.expect("create memory");

    let mut fact = Fact::new("space-1", "likes jazz", FactType::Preference, SourceType::Conversation);
    fact.user_id = Some("user-1".to_string());
    backend.create_fact(&fact).await.expect("create fact");

    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let cascade = GdprCascade::new(backend.clone(), None::<Arc<UnusedGraphAdapter>>, envelope);

    let report = cascade.run("user-1").await.expect("cascade");
    assert_eq!(report.deleted.get("memories"), Some(&1));
    assert_eq!(report.deleted.get("facts"), Some(&1));

    assert!(backend.get_memory(&memory.memory_id).await.expect("get").is_none());
    assert!(backend.get_fact(&fact.fact_id).await.expect("get").is_none());
    assert!(backend.get_cascade_job("user-1").await.expect("job").is_none());
}

#[tokio::test]
async fn resumes_from_a_partially_completed_job() {
    let (backend, _dir) = backend().await;

    let mut memory = Memory::new("space-1", "hi", ContentType::Raw, SourceType::Conversation);
    memory.user_id = Some("user-2".to_string());
    backend.create_memory(&memory).await.expect("create memory");

    // Simulate a crash after "conversations" and "immutable" already ran.
    let job = GdprCascadeJob::new(
        "user-2",
        vec!["mutable".to_string(), "memories".to_string(), "facts".to_string()],
    );
    backend.create_cascade_job(&job).await.expect("seed job");

    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let cascade = GdprCascade::new(backend.clone(), None::<Arc<UnusedGraphAdapter>>, envelope);

    let report = cascade.run("user-2").await.expect("resume");
    assert_eq!(report.deleted.len(), 3);
    assert!(backend.get_memory(&memory.memory_id).await.expect("get").is_none());
    assert!(backend.get_cascade_job("user-2").await.expect("job").is_none());
}
