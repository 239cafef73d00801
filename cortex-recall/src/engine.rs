use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::warn;

use cortex_core::config::RecallConfig;
use cortex_core::errors::{CortexResult, RecallError};
use cortex_core::models::{Fact, Memory};
use cortex_core::traits::{IFactStorage, IMemoryStorage};

use crate::ranking;
use crate::sources::{search_facts, search_graph, search_vector, SourceStats};
use crate::RecallResult;

/// One recall request (spec §4.5).
#[derive(Debug, Clone)]
pub struct RecallQuery {
    pub memory_space_id: String,
    pub query_text: String,
    pub embedding: Option<Vec<f32>>,
    pub top_k: Option<usize>,
    pub include_superseded: bool,
}

impl RecallQuery {
    pub fn new(memory_space_id: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            memory_space_id: memory_space_id.into(),
            query_text: query_text.into(),
            embedding: None,
            top_k: None,
            include_superseded: false,
        }
    }
}

/// Multi-source recall engine (spec §4.5). `G` is the optional
/// native-graph adapter; pass `None` at construction to run vector+facts
/// only.
pub struct RecallEngine<S, G> {
    storage: Arc<S>,
    graph_adapter: Option<Arc<G>>,
    config: RecallConfig,
}

impl<S, G> RecallEngine<S, G>
where
    S: IMemoryStorage + IFactStorage + 'static,
    G: cortex_core::traits::IGraphAdapter + 'static,
{
    pub fn new(storage: Arc<S>, graph_adapter: Option<Arc<G>>, config: RecallConfig) -> Self {
        Self {
            storage,
            graph_adapter,
            config,
        }
    }

    pub async fn recall(&self, query: RecallQuery) -> CortexResult<RecallResult> {
        let deadline = Duration::from_millis(self.config.total_deadline_ms);
        match tokio::time::timeout(deadline, self.recall_inner(query)).await {
            Ok(result) => result,
            Err(_) => Err(RecallError::DeadlineExceeded {
                deadline_ms: self.config.total_deadline_ms,
            }
            .into()),
        }
    }

    async fn recall_inner(&self, query: RecallQuery) -> CortexResult<RecallResult> {
        let top_k = query.top_k.unwrap_or(self.config.default_top_k);
        let candidate_pool = top_k.saturating_mul(3).max(top_k);
        let per_source_timeout = Duration::from_millis(self.config.per_source_timeout_ms);

        let (vector_result, vector_stats) = self.run_vector(&query, candidate_pool, per_source_timeout).await;
        let (facts_result, facts_stats) = self.run_facts(&query, candidate_pool, per_source_timeout).await;
        let (graph_entities, graph_stats) = self.run_graph(&query, candidate_pool, per_source_timeout).await;

        let mut sources = HashMap::new();
        sources.insert("vector".to_string(), vector_stats);
        sources.insert("facts".to_string(), facts_stats);
        sources.insert("graph".to_string(), graph_stats);

        let graph_ids: std::collections::HashSet<&str> = graph_entities.iter().map(|n| n.id.as_str()).collect();

        let now = Utc::now();
        let weights = &self.config.weights;
        let half_life = self.config.recency_half_life_secs;
        let access_k = self.config.access_log_k;

        let mut memories: Vec<(Memory, f64)> = vector_result
            .into_iter()
            .map(|(memory, similarity)| {
                let num_sources = 1 + usize::from(graph_ids.contains(memory.memory_id.as_str()));
                let ranked = ranking::score(
                    weights,
                    similarity,
                    memory.importance,
                    100,
                    memory.created_at,
                    now,
                    memory.access_count,
                    access_k,
                    half_life,
                    num_sources,
                );
                (memory, ranked)
            })
            .collect();
        memories.sort_by(|(a, sa), (b, sb)| cmp_ranked(*sa, *sb, a.created_at, b.created_at, &a.memory_id, &b.memory_id));
        memories.truncate(top_k);

        let mut facts: Vec<(Fact, f64)> = facts_result
            .into_iter()
            .map(|(fact, similarity)| {
                let num_sources = 1 + usize::from(graph_ids.contains(fact.fact_id.as_str()));
                let ranked = ranking::score(weights, similarity, 50, fact.confidence, fact.created_at, now, 0, access_k, half_life, num_sources);
                (fact, ranked)
            })
            .collect();
        facts.sort_by(|(a, sa), (b, sb)| cmp_ranked(*sa, *sb, a.created_at, b.created_at, &a.fact_id, &b.fact_id));
        facts.truncate(top_k);

        let total_results = memories.len() + facts.len() + graph_entities.len();
        Ok(RecallResult {
            memories,
            facts,
            graph_entities,
            sources,
            total_results,
        })
    }

    async fn run_vector(&self, query: &RecallQuery, limit: usize, timeout: Duration) -> (Vec<(Memory, f64)>, SourceStats) {
        let Some(embedding) = &query.embedding else {
            return (Vec::new(), SourceStats::default());
        };
        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, search_vector(self.storage.as_ref(), &query.memory_space_id, embedding, limit)).await;
        let latency_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(Ok(results)) => {
                let stats = SourceStats {
                    count: results.len(),
                    latency_ms,
                    error: None,
                };
                (results, stats)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "vector recall source failed");
                (Vec::new(), SourceStats { count: 0, latency_ms, error: Some(err.to_string()) })
            }
            Err(_) => {
                warn!("vector recall source timed out");
                (
                    Vec::new(),
                    SourceStats {
                        count: 0,
                        latency_ms,
                        error: Some(
                            RecallError::SourceTimeout {
                                source_name: "vector".to_string(),
                                elapsed_ms: latency_ms,
                            }
                            .to_string(),
                        ),
                    },
                )
            }
        }
    }

    async fn run_facts(&self, query: &RecallQuery, limit: usize, timeout: Duration) -> (Vec<(Fact, f64)>, SourceStats) {
        let started = Instant::now();
        let outcome = tokio::time::timeout(
            timeout,
            search_facts(self.storage.as_ref(), &query.memory_space_id, &query.query_text, query.include_superseded, limit),
        )
        .await;
        let latency_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(Ok(results)) => {
                let stats = SourceStats {
                    count: results.len(),
                    latency_ms,
                    error: None,
                };
                (results, stats)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "facts recall source failed");
                (Vec::new(), SourceStats { count: 0, latency_ms, error: Some(err.to_string()) })
            }
            Err(_) => {
                warn!("facts recall source timed out");
                (
                    Vec::new(),
                    SourceStats {
                        count: 0,
                        latency_ms,
                        error: Some(
                            RecallError::SourceTimeout {
                                source_name: "facts".to_string(),
                                elapsed_ms: latency_ms,
                            }
                            .to_string(),
                        ),
                    },
                )
            }
        }
    }

    async fn run_graph(&self, query: &RecallQuery, limit: usize, timeout: Duration) -> (Vec<cortex_core::traits::GraphNode>, SourceStats) {
        let Some(adapter) = &self.graph_adapter else {
            return (Vec::new(), SourceStats::default());
        };
        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, search_graph(adapter.as_ref(), &query.query_text, limit)).await;
        let latency_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(Ok(results)) => {
                let stats = SourceStats {
                    count: results.len(),
                    latency_ms,
                    error: None,
                };
                (results, stats)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "graph recall source failed");
                (Vec::new(), SourceStats { count: 0, latency_ms, error: Some(err.to_string()) })
            }
            Err(_) => {
                warn!("graph recall source timed out");
                (
                    Vec::new(),
                    SourceStats {
                        count: 0,
                        latency_ms,
                        error: Some(
                            RecallError::SourceTimeout {
                                source_name: "graph".to_string(),
                                elapsed_ms: latency_ms,
                            }
                            .to_string(),
                        ),
                    },
                )
            }
        }
    }
}

/// Sort descending by score, tying on `createdAt` desc then id asc (spec §4.5).
fn cmp_ranked(score_a: f64, score_b: f64, created_a: chrono::DateTime<Utc>, created_b: chrono::DateTime<Utc>, id_a: &str, id_b: &str) -> std::cmp::Ordering {
    score_b
        .partial_cmp(&score_a)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| created_b.cmp(&created_a))
        .then_with(|| id_a.cmp(id_b))
}
