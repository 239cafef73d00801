//! `remember` scenarios (spec §4.6, §8): atomic write path and graceful
//! degradation when fact extraction fails, exercised against a real
//! SQLite backend.

use std::sync::Arc;

use async_trait::async_trait;
use cortex_core::config::{BeliefRevisionConfig, OrchestratorConfig, RecallConfig};
use cortex_core::config::ResilienceConfig;
use cortex_core::errors::CortexResult;
use cortex_core::traits::IStorageBackend;
use cortex_core::traits::{ChatMessage, ChatOptions, GraphNode, IConversationStorage, IEmbeddingProvider, IGraphAdapter, ILlmProvider};
use cortex_orchestrator::{Orchestrator, RememberRequest};
use cortex_resilience::ResilienceEnvelope;
use cortex_storage::SqliteBackend;

struct UnusedEmbedder;

#[async_trait]
impl IEmbeddingProvider for UnusedEmbedder {
    async fn embed(&self, _text: &str) -> CortexResult<Vec<f32>> {
        unreachable!()
    }
    async fn embed_batch(&self, _texts: &[String]) -> CortexResult<Vec<Vec<f32>>> {
        unreachable!()
    }
    fn dimensions(&self) -> usize {
        4
    }
    fn name(&self) -> &str {
        "unused"
    }
}

struct StubLlm(String);

#[async_trait]
impl ILlmProvider for StubLlm {
    async fn chat(&self, _messages: &[ChatMessage], _options: &ChatOptions) -> CortexResult<String> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &str {
        "stub"
    }
}

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

type TestOrchestrator = Orchestrator<SqliteBackend, UnusedEmbedder, StubLlm, UnusedGraphAdapter>;

async fn backend() -> (Arc<SqliteBackend>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = Arc::new(SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open"));
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

fn orchestrator(backend: Arc<SqliteBackend>, llm_response: &str) -> TestOrchestrator {
    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    Orchestrator::new(
        backend,
        None,
        Some(Arc::new(StubLlm(llm_response.to_string()))),
        None::<Arc<UnusedGraphAdapter>>,
        envelope,
        OrchestratorConfig::default(),
        BeliefRevisionConfig::default(),
        RecallConfig::default(),
    )
}

#[tokio::test]
async fn remember_appends_messages_and_writes_memory_with_extracted_fact() {
    let (backend, _dir) = backend().await;
    let orchestrator = orchestrator(backend.clone(), r#"{"facts":[{"text":"likes jazz","factType":"preference","confidence":80}]}"#);

    let mut request = RememberRequest::new("space-1", "I love jazz music", "Noted, you enjoy jazz.");
    request.user_id = Some("user-1".to_string());

    let result = orchestrator.remember(request).await.expect("remember");
    assert_eq!(result.message_ids.len(), 2);
    assert_eq!(result.fact_outcomes.len(), 1);
    assert!(result.memory.facts_ref.is_some());

    let conversation = backend.get_conversation(&result.conversation_id).await.expect("get").expect("exists");
    assert_eq!(conversation.messages.len(), 2);
}

#[tokio::test]
async fn remember_degrades_gracefully_on_malformed_extraction() {
    let (backend, _dir) = backend().await;
    let orchestrator = orchestrator(backend.clone(), "not json");

    let request = RememberRequest::new("space-1", "hello", "hi there");
    let result = orchestrator.remember(request).await.expect("remember still succeeds");
    assert!(result.fact_outcomes.is_empty());
    assert!(result.memory.facts_ref.is_none());
}

#[tokio::test]
async fn remember_skips_extraction_when_disabled() {
    let (backend, _dir) = backend().await;
    let orchestrator = orchestrator(backend.clone(), r#"{"facts":[{"text":"likes jazz","factType":"preference"}]}"#);

    let mut request = RememberRequest::new("space-1", "hello", "hi there");
    request.extract_facts = Some(false);
    let result = orchestrator.remember(request).await.expect("remember");
    assert!(result.fact_outcomes.is_empty());
}
