//! Belief revision scenarios (spec §8): duplicate-fact skip and
//! conflict-triggered supersede, exercised against a real SQLite backend.

use std::sync::Arc;

use async_trait::async_trait;
use cortex_beliefs::BeliefRevisionPipeline;
use cortex_core::config::{BeliefRevisionConfig, ResilienceConfig};
use cortex_core::errors::CortexResult;
use cortex_core::models::{BeliefOutcome, Fact, FactType, SourceType};
use cortex_core::traits::{IEmbeddingProvider, IFactStorage, ILlmProvider, IStorageBackend};
use cortex_resilience::ResilienceEnvelope;
use cortex_storage::SqliteBackend;

struct NoopEmbedder;

#[async_trait]
impl IEmbeddingProvider for NoopEmbedder {
    async fn embed(&self, _text: &str) -> CortexResult<Vec<f32>> {
        Ok(vec![0.0; 4])
    }
    async fn embed_batch(&self, texts: &[String]) -> CortexResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
    }
    fn dimensions(&self) -> usize {
        4
    }
    fn name(&self) -> &str {
        "noop"
    }
}

struct NoopLlm;

#[async_trait]
impl ILlmProvider for NoopLlm {
    async fn chat(
        &self,
        _messages: &[cortex_core::traits::ChatMessage],
        _options: &cortex_core::traits::ChatOptions,
    ) -> CortexResult<String> {
        unreachable!("no test in this module configures an LLM adjudicator")
    }
    fn name(&self) -> &str {
        "noop"
    }
}

type TestPipeline = BeliefRevisionPipeline<SqliteBackend, NoopEmbedder, NoopLlm>;

async fn pipeline() -> (TestPipeline, Arc<SqliteBackend>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = Arc::new(SqliteBackend::open(&dir.path().join("cortex.db"), 4).expect("open"));
    backend.migrate().await.expect("migrate");
    let envelope = Arc::new(ResilienceEnvelope::new(&ResilienceConfig::default()));
    let pipeline = BeliefRevisionPipeline::new(backend.clone(), None::<Arc<NoopEmbedder>>, None::<Arc<NoopLlm>>, envelope, BeliefRevisionConfig::default());
    (pipeline, backend, dir)
}

fn fact(space: &str, user: &str, subject: &str, predicate: &str, text: &str) -> Fact {
    let mut f = Fact::new(space, text, FactType::Preference, SourceType::Conversation);
    f.user_id = Some(user.to_string());
    f.triple.subject = Some(subject.to_string());
    f.triple.predicate = Some(predicate.to_string());
    f
}

#[tokio::test]
async fn duplicate_candidate_is_skipped() {
    let (pipeline, backend, _dir) = pipeline().await;
    let first = fact("space-1", "user-1", "user-1", "drinks", "drinks black coffee");
    let result = pipeline.revise(first.clone()).await.expect("first revise");
    assert_eq!(result.outcome, BeliefOutcome::Create);

    let duplicate = fact("space-1", "user-1", "user-1", "drinks", "Drinks Black Coffee");
    let result = pipeline.revise(duplicate).await.expect("second revise");
    assert_eq!(result.outcome, BeliefOutcome::Skip);
    assert_eq!(result.fact.fact_id, first.fact_id);

    let stored = backend.list_facts_by_space("space-1", true).await.expect("list");
    assert_eq!(stored.len(), 1, "duplicate must not create a second row");
}

#[tokio::test]
async fn conflicting_candidate_supersedes_without_llm() {
    let (pipeline, backend, _dir) = pipeline().await;
    let original = fact("space-1", "user-1", "user-1", "livesIn", "lives in Austin");
    let created = pipeline.revise(original).await.expect("first revise");
    assert_eq!(created.outcome, BeliefOutcome::Create);

    let update = fact("space-1", "user-1", "user-1", "livesIn", "lives in Boston");
    let revised = pipeline.revise(update).await.expect("second revise");
    assert_eq!(revised.outcome, BeliefOutcome::Supersede);
    assert_eq!(revised.fact.supersedes.as_deref(), Some(created.fact.fact_id.as_str()));

    let old = backend.get_fact(&created.fact.fact_id).await.expect("get old").expect("old exists");
    assert_eq!(old.superseded_by.as_deref(), Some(revised.fact.fact_id.as_str()));
    assert!(!old.is_active());
}
