use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use cortex_core::config::BeliefRevisionConfig;
use cortex_core::errors::{BeliefError, CortexResult};
use cortex_core::models::fact::canonicalize;
use cortex_core::models::{BeliefOutcome, Fact, FactHistoryAction, FactHistoryEntry, PipelineFlags, Priority};
use cortex_core::traits::{IEmbeddingProvider, IFactHistoryStorage, IFactStorage, ILlmProvider};
use cortex_graph::supersede::would_create_cycle;
use cortex_resilience::ResilienceEnvelope;

use crate::adjudicate::{self, Adjudication};
use crate::semantic;
use crate::slot;

const CANDIDATE_POOL: usize = 10;
const SEMAPHORE_TIMEOUT: Duration = Duration::from_secs(2);
const DEADLINE: Duration = Duration::from_secs(10);

/// Outcome of one `revise` call: the resolved fact (the candidate on
/// create/supersede, the merged fact on update, the pre-existing fact on
/// skip) and the `factHistory` event id that records the decision.
#[derive(Debug, Clone)]
pub struct RevisionResult {
    pub outcome: BeliefOutcome,
    pub fact: Fact,
    pub history_event_id: String,
}

/// Belief revision pipeline (spec §4.4): slot matching, semantic matching,
/// then LLM-or-deterministic adjudication, with every decision appended to
/// `factHistory`.
pub struct BeliefRevisionPipeline<S, E, L> {
    storage: Arc<S>,
    embedder: Option<Arc<E>>,
    llm: Option<Arc<L>>,
    envelope: Arc<ResilienceEnvelope>,
    config: BeliefRevisionConfig,
}

impl<S, E, L> BeliefRevisionPipeline<S, E, L>
where
    S: IFactStorage + IFactHistoryStorage + 'static,
    E: IEmbeddingProvider + 'static,
    L: ILlmProvider + 'static,
{
    pub fn new(
        storage: Arc<S>,
        embedder: Option<Arc<E>>,
        llm: Option<Arc<L>>,
        envelope: Arc<ResilienceEnvelope>,
        config: BeliefRevisionConfig,
    ) -> Self {
        Self {
            storage,
            embedder,
            llm,
            envelope,
            config,
        }
    }

    /// Run the full pipeline for `candidate` (spec §4.4). `candidate`
    /// should already carry `memory_space_id`, `user_id`, and `triple`
    /// populated by the extraction step upstream; its embedding is filled
    /// in here if an embedding provider is configured and it is absent.
    pub async fn revise(&self, candidate: Fact) -> CortexResult<RevisionResult> {
        self.envelope
            .execute(Priority::High, "beliefs:revise", SEMAPHORE_TIMEOUT, DEADLINE, || {
                self.revise_inner(candidate)
            })
            .await
    }

    async fn revise_inner(&self, mut candidate: Fact) -> CortexResult<RevisionResult> {
        if candidate.embedding.is_none() {
            if let Some(embedder) = &self.embedder {
                match embedder.embed(&candidate.fact).await {
                    Ok(embedding) => candidate.embedding = Some(embedding),
                    Err(err) => warn!(error = %err, "embedding candidate fact failed, skipping stage 2"),
                }
            }
        }

        let mut pipeline = PipelineFlags::default();

        let slot_matches = slot::find_slot_matches(self.storage.as_ref(), &candidate.memory_space_id, &candidate.slot_key()).await?;
        pipeline.slot_matching = true;

        if let Some(duplicate) = slot::exact_duplicate(&slot_matches, &candidate) {
            let duplicate = duplicate.clone();
            return self
                .skip(candidate, duplicate, pipeline, "duplicate of an active fact in the same slot")
                .await;
        }

        let mut conflict = slot_matches.into_iter().next();

        if conflict.is_none() {
            if let Some(embedding) = candidate.embedding.clone() {
                pipeline.semantic_matching = true;
                if let Some((fact, _score)) = semantic::nearest_active_match(
                    self.storage.as_ref(),
                    &candidate.memory_space_id,
                    &embedding,
                    self.config.semantic_similarity_threshold,
                    CANDIDATE_POOL,
                )
                .await?
                {
                    if canonicalize(&fact.fact) == canonicalize(&candidate.fact) {
                        return self
                            .skip(candidate, fact, pipeline, "duplicate of the nearest semantically active fact")
                            .await;
                    }
                    conflict = Some(fact);
                }
            }
        }

        let Some(existing) = conflict else {
            return self.create(candidate, pipeline).await;
        };

        pipeline.llm_resolution = self.llm.is_some();
        let adjudication = match &self.llm {
            Some(llm) => adjudicate::llm_adjudicate(llm.as_ref(), &candidate, &existing).await,
            None => adjudicate::deterministic_fallback(&existing),
        };

        self.apply(candidate, existing, pipeline, adjudication).await
    }

    async fn apply(
        &self,
        candidate: Fact,
        existing: Fact,
        pipeline: PipelineFlags,
        adjudication: Adjudication,
    ) -> CortexResult<RevisionResult> {
        match adjudication.outcome {
            BeliefOutcome::Skip => self.skip(candidate, existing, pipeline, &adjudication.reason).await,
            BeliefOutcome::Create => self.create(candidate, pipeline).await,
            BeliefOutcome::Update => self.update(candidate, existing, pipeline, &adjudication.reason).await,
            BeliefOutcome::Supersede => self.supersede(candidate, existing, pipeline, &adjudication.reason).await,
        }
    }

    async fn create(&self, candidate: Fact, pipeline: PipelineFlags) -> CortexResult<RevisionResult> {
        self.storage.create_fact(&candidate).await?;
        let mut entry = FactHistoryEntry::new(&candidate.fact_id, &candidate.memory_space_id, FactHistoryAction::Create);
        entry.new_value = Some(serde_json::to_value(&candidate).unwrap_or_default());
        entry.confidence = Some(candidate.confidence);
        entry.user_id = candidate.user_id.clone();
        entry.pipeline = pipeline;
        self.storage.append(&entry).await?;
        info!(fact_id = %candidate.fact_id, "belief revision: create");
        Ok(RevisionResult {
            outcome: BeliefOutcome::Create,
            fact: candidate,
            history_event_id: entry.event_id,
        })
    }

    async fn update(
        &self,
        candidate: Fact,
        mut existing: Fact,
        pipeline: PipelineFlags,
        reason: &str,
    ) -> CortexResult<RevisionResult> {
        let old_value = serde_json::to_value(&existing).unwrap_or_default();
        existing.fact = candidate.fact;
        existing.confidence = candidate.confidence.max(existing.confidence);
        if candidate.embedding.is_some() {
            existing.embedding = candidate.embedding;
        }
        existing.enrichment = candidate.enrichment;
        existing.version += 1;
        existing.updated_at = chrono::Utc::now();
        self.storage.update_fact(&existing).await?;

        let mut entry = FactHistoryEntry::new(&existing.fact_id, &existing.memory_space_id, FactHistoryAction::Update);
        entry.old_value = Some(old_value);
        entry.new_value = Some(serde_json::to_value(&existing).unwrap_or_default());
        entry.reason = Some(reason.to_string());
        entry.confidence = Some(existing.confidence);
        entry.user_id = existing.user_id.clone();
        entry.pipeline = pipeline;
        self.storage.append(&entry).await?;
        info!(fact_id = %existing.fact_id, "belief revision: update");
        Ok(RevisionResult {
            outcome: BeliefOutcome::Update,
            fact: existing,
            history_event_id: entry.event_id,
        })
    }

    async fn supersede(
        &self,
        mut candidate: Fact,
        existing: Fact,
        pipeline: PipelineFlags,
        reason: &str,
    ) -> CortexResult<RevisionResult> {
        let supersedes_map = self.build_supersedes_map(&candidate.memory_space_id).await?;
        if would_create_cycle(&supersedes_map, &candidate.fact_id, &existing.fact_id) {
            warn!(fact_id = %existing.fact_id, "refusing supersede: would create a cycle");
            let mut entry = FactHistoryEntry::new(&existing.fact_id, &existing.memory_space_id, FactHistoryAction::Skip);
            entry.reason = Some(format!("refused circular supersede: {reason}"));
            entry.user_id = existing.user_id.clone();
            entry.pipeline = pipeline;
            self.storage.append(&entry).await?;
            return Err(BeliefError::CircularSupersede {
                fact_id: existing.fact_id,
            }
            .into());
        }

        candidate.supersedes = Some(existing.fact_id.clone());
        self.storage.create_fact(&candidate).await?;
        self.storage.supersede(&existing.fact_id, &candidate.fact_id).await?;

        let mut entry = FactHistoryEntry::new(&candidate.fact_id, &candidate.memory_space_id, FactHistoryAction::Supersede);
        entry.old_value = Some(serde_json::to_value(&existing).unwrap_or_default());
        entry.new_value = Some(serde_json::to_value(&candidate).unwrap_or_default());
        entry.supersedes = Some(existing.fact_id.clone());
        entry.superseded_by = Some(candidate.fact_id.clone());
        entry.reason = Some(reason.to_string());
        entry.confidence = Some(candidate.confidence);
        entry.user_id = candidate.user_id.clone();
        entry.pipeline = pipeline;
        self.storage.append(&entry).await?;
        info!(fact_id = %candidate.fact_id, superseded = %existing.fact_id, "belief revision: supersede");
        Ok(RevisionResult {
            outcome: BeliefOutcome::Supersede,
            fact: candidate,
            history_event_id: entry.event_id,
        })
    }

    async fn skip(
        &self,
        candidate: Fact,
        matched: Fact,
        pipeline: PipelineFlags,
        reason: &str,
    ) -> CortexResult<RevisionResult> {
        let mut entry = FactHistoryEntry::new(&matched.fact_id, &matched.memory_space_id, FactHistoryAction::Skip);
        entry.old_value = Some(serde_json::to_value(&matched).unwrap_or_default());
        entry.new_value = Some(serde_json::to_value(&candidate).unwrap_or_default());
        entry.reason = Some(reason.to_string());
        entry.user_id = matched.user_id.clone();
        entry.pipeline = pipeline;
        self.storage.append(&entry).await?;
        info!(fact_id = %matched.fact_id, "belief revision: skip");
        Ok(RevisionResult {
            outcome: BeliefOutcome::Skip,
            fact: matched,
            history_event_id: entry.event_id,
        })
    }

    /// Reconstruct the `supersedes` adjacency used by the acyclicity check
    /// (spec §4.4 Stage 3, §8 item 2) from every fact on record, active or not.
    async fn build_supersedes_map(&self, memory_space_id: &str) -> CortexResult<HashMap<String, String>> {
        let all = self.storage.list_facts_by_space(memory_space_id, true).await?;
        Ok(all
            .into_iter()
            .filter_map(|f| f.supersedes.clone().map(|s| (f.fact_id, s)))
            .collect())
    }
}
