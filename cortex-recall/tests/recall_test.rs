//! Recall fusion scenarios (spec §8): ranking monotonicity and per-source
//! failure isolation, exercised against a real SQLite backend.

use std::sync::Arc;

use async_trait::async_trait;
use cortex_core::config::RecallConfig;
use cortex_core::errors::CortexResult;
use cortex_core::models::{ContentType, Fact, FactType, Memory, SourceType};
use cortex_core::traits::{GraphNode, IFactStorage, IGraphAdapter, IMemoryStorage, IStorageBackend};
use cortex_recall::{RecallEngine, RecallQuery};
use cortex_storage::SqliteBackend;

/// No test in this module configures a graph adapter; `RecallEngine` still
/// needs a concrete `G: IGraphAdapter` to name, even when `None` is passed.
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

type NullGraphAdapter = UnusedGraphAdapter;

async fn backend() -> (Arc<SqliteBackend>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = Arc::new(SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open"));
    backend.migrate().await.expect("migrate");
    (backend, dir)
}

fn unit_vec(dims: usize, hot: usize) -> Vec<f32> {
    let mut v = vec![0.0_f32; dims];
    v[hot] = 1.0;
    v
}

#[tokio::test]
async fn closer_embedding_ranks_above_farther_one() {
    let (backend, _dir) = backend().await;

    let mut near = Memory::new("space-1", "near memory", ContentType::Raw, SourceType::Conversation);
    near.embedding = Some(unit_vec(4, 0));
    backend.create_memory(&near).await.expect("create near");

    let mut far = Memory::new("space-1", "far memory", ContentType::Raw, SourceType::Conversation);
    far.embedding = Some(vec![0.0, 1.0, 0.0, 0.0]);
    backend.create_memory(&far).await.expect("create far");

    let engine: RecallEngine<SqliteBackend, NullGraphAdapter> = RecallEngine::new(backend.clone(), None, RecallConfig::default());
    let mut query = RecallQuery::new("space-1", "anything");
    query.embedding = Some(unit_vec(4, 0));
    query.top_k = Some(5);

    let result = engine.recall(query).await.expect("recall");
    assert_eq!(result.memories.len(), 2);
    assert_eq!(result.memories[0].0.content, "near memory");
    assert!(result.memories[0].1 > result.memories[1].1);
}

#[tokio::test]
async fn facts_source_ranks_by_keyword_overlap() {
    let (backend, _dir) = backend().await;

    let mut strong = Fact::new("space-1", "enjoys black coffee every morning", FactType::Preference, SourceType::Conversation);
    strong.user_id = Some("user-1".to_string());
    backend.create_fact(&strong).await.expect("create strong");

    let mut weak = Fact::new("space-1", "dislikes tea", FactType::Preference, SourceType::Conversation);
    weak.user_id = Some("user-1".to_string());
    backend.create_fact(&weak).await.expect("create weak");

    let engine: RecallEngine<SqliteBackend, NullGraphAdapter> = RecallEngine::new(backend.clone(), None, RecallConfig::default());
    let query = RecallQuery::new("space-1", "black coffee morning");

    let result = engine.recall(query).await.expect("recall");
    assert!(!result.facts.is_empty());
    assert_eq!(result.facts[0].0.fact_id, strong.fact_id);
    assert!(result.sources.get("vector").is_some());
    assert_eq!(result.sources["vector"].count, 0, "no embedding on the query means the vector source is skipped, not failed");
}

#[tokio::test]
async fn top_k_truncates_fused_results() {
    let (backend, _dir) = backend().await;

    for i in 0..5 {
        let mut fact = Fact::new("space-1", format!("fact about topic {i}"), FactType::Knowledge, SourceType::Conversation);
        fact.user_id = Some("user-1".to_string());
        backend.create_fact(&fact).await.expect("create");
    }

    let engine: RecallEngine<SqliteBackend, NullGraphAdapter> = RecallEngine::new(backend.clone(), None, RecallConfig::default());
    let mut query = RecallQuery::new("space-1", "topic");
    query.top_k = Some(2);

    let result = engine.recall(query).await.expect("recall");
    assert_eq!(result.facts.len(), 2);
}
