use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use cortex_core::config::{BeliefRevisionConfig, OrchestratorConfig};
use cortex_core::errors::CortexResult;
use cortex_core::models::{
    Conversation, ConversationRef, ConversationType, ContentType, Fact, FactsRef, Memory,
    Message, MessageRole, Priority, SourceType,
};
use cortex_core::traits::{
    IConversationStorage, IEmbeddingProvider, IFactHistoryStorage, IFactStorage, IGraphAdapter,
    IGraphSyncQueueStorage, ILlmProvider, IMemoryStorage,
};
use cortex_core::models::GraphSyncOperation;
use cortex_beliefs::{BeliefRevisionPipeline, RevisionResult};
use cortex_recall::{RecallEngine, RecallQuery, RecallResult};
use cortex_resilience::ResilienceEnvelope;

const SEMAPHORE_TIMEOUT: Duration = Duration::from_secs(2);
const STEP_DEADLINE: Duration = Duration::from_secs(10);

/// Inputs for a `remember` call (spec §4.6).
#[derive(Debug, Clone)]
pub struct RememberRequest {
    pub memory_space_id: String,
    pub conversation_id: Option<String>,
    pub conversation_type: ConversationType,
    pub user_message: String,
    pub agent_response: String,
    pub user_id: Option<String>,
    pub participant_id: Option<String>,
    pub agent_id: Option<String>,
    pub user_name: Option<String>,
    pub agent_name: Option<String>,
    pub importance: Option<u8>,
    pub tags: Vec<String>,
    pub extract_facts: Option<bool>,
    pub belief_revision: Option<bool>,
    pub generate_embedding: Option<bool>,
    /// Caller-supplied embedding, bypassing the configured provider.
    pub embedding: Option<Vec<f32>>,
}

impl RememberRequest {
    pub fn new(memory_space_id: impl Into<String>, user_message: impl Into<String>, agent_response: impl Into<String>) -> Self {
        Self {
            memory_space_id: memory_space_id.into(),
            conversation_id: None,
            conversation_type: ConversationType::UserAgent,
            user_message: user_message.into(),
            agent_response: agent_response.into(),
            user_id: None,
            participant_id: None,
            agent_id: None,
            user_name: None,
            agent_name: None,
            importance: None,
            tags: Vec::new(),
            extract_facts: None,
            belief_revision: None,
            generate_embedding: None,
            embedding: None,
        }
    }
}

/// Result of a `remember` call: what was written and what belief revision
/// decided about any extracted facts.
#[derive(Debug, Clone)]
pub struct RememberResult {
    pub conversation_id: String,
    pub message_ids: Vec<String>,
    pub memory: Memory,
    pub fact_outcomes: Vec<RevisionResult>,
    pub graph_sync_enqueued: bool,
}

/// The `remember`/`recall` facade (C6, spec §4.6): composes conversation
/// append, memory write, belief revision, and graph sync enqueue into one
/// logical operation, all gated through the resilience envelope.
pub struct Orchestrator<S, E, L, G> {
    storage: Arc<S>,
    embedder: Option<Arc<E>>,
    llm: Option<Arc<L>>,
    graph_adapter: Option<Arc<G>>,
    beliefs: BeliefRevisionPipeline<S, E, L>,
    recall: RecallEngine<S, G>,
    envelope: Arc<ResilienceEnvelope>,
    config: OrchestratorConfig,
}

impl<S, E, L, G> Orchestrator<S, E, L, G>
where
    S: IConversationStorage + IMemoryStorage + IFactStorage + IFactHistoryStorage + IGraphSyncQueueStorage + 'static,
    E: IEmbeddingProvider + 'static,
    L: ILlmProvider + 'static,
    G: IGraphAdapter + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        storage: Arc<S>,
        embedder: Option<Arc<E>>,
        llm: Option<Arc<L>>,
        graph_adapter: Option<Arc<G>>,
        envelope: Arc<ResilienceEnvelope>,
        config: OrchestratorConfig,
        belief_config: BeliefRevisionConfig,
        recall_config: cortex_core::config::RecallConfig,
    ) -> Self {
        let beliefs = BeliefRevisionPipeline::new(storage.clone(), embedder.clone(), llm.clone(), envelope.clone(), belief_config);
        let recall = RecallEngine::new(storage.clone(), graph_adapter.clone(), recall_config);
        Self {
            storage,
            embedder,
            llm,
            graph_adapter,
            beliefs,
            recall,
            envelope,
            config,
        }
    }

    pub async fn remember(&self, request: RememberRequest) -> CortexResult<RememberResult> {
        let conversation_id = self.ensure_conversation(&request).await?;
        let message_ids = self.append_exchange(&conversation_id, &request).await?;
        let content = enrich_content(&request);

        let embedding = self.resolve_embedding(&request, &content).await;
        let fact_outcomes = self.extract_and_revise(&request, &content).await;
        let primary_fact = fact_outcomes.first().map(|r| r.fact.clone());

        let memory = self
            .build_memory(&request, &conversation_id, &message_ids, content, embedding, primary_fact.as_ref())
            .await?;

        let graph_sync_enqueued = self.enqueue_graph_sync(&memory).await;

        Ok(RememberResult {
            conversation_id,
            message_ids,
            memory,
            fact_outcomes,
            graph_sync_enqueued,
        })
    }

    pub async fn recall(&self, query: RecallQuery) -> CortexResult<RecallResult> {
        self.recall.recall(query).await
    }

    async fn ensure_conversation(&self, request: &RememberRequest) -> CortexResult<String> {
        if let Some(id) = &request.conversation_id {
            if self.storage.get_conversation(id).await?.is_some() {
                return Ok(id.clone());
            }
        }

        let mut conversation = Conversation::new(request.memory_space_id.clone(), request.conversation_type);
        conversation.participant_id = request.participant_id.clone();
        let conversation_id = conversation.conversation_id.clone();
        self.envelope
            .execute(Priority::High, "orchestrator:create_conversation", SEMAPHORE_TIMEOUT, STEP_DEADLINE, || async {
                self.storage.create_conversation(&conversation).await
            })
            .await?;
        Ok(conversation_id)
    }

    /// Step 1: append both messages as a single write (spec §4.6).
    async fn append_exchange(&self, conversation_id: &str, request: &RememberRequest) -> CortexResult<Vec<String>> {
        let mut user_message = Message::new(MessageRole::User, request.user_message.clone());
        user_message.participant_id = request.participant_id.clone();
        let mut agent_message = Message::new(MessageRole::Agent, request.agent_response.clone());
        agent_message.participant_id = request.agent_id.clone();
        let messages = vec![user_message, agent_message];

        self.envelope
            .execute(Priority::High, "orchestrator:append_messages", SEMAPHORE_TIMEOUT, STEP_DEADLINE, || async {
                self.storage.append_messages(conversation_id, &messages).await
            })
            .await
    }

    async fn resolve_embedding(&self, request: &RememberRequest, content: &str) -> Option<Vec<f32>> {
        if request.embedding.is_some() {
            return request.embedding.clone();
        }
        let should_generate = request.generate_embedding.unwrap_or(self.config.generate_embedding_by_default);
        let embedder = self.embedder.as_ref()?;
        if !should_generate {
            return None;
        }

        let content = content.to_string();
        let outcome = self
            .envelope
            .execute(Priority::High, "orchestrator:embed", SEMAPHORE_TIMEOUT, STEP_DEADLINE, || async { embedder.embed(&content).await })
            .await;
        match outcome {
            Ok(embedding) => Some(embedding),
            Err(err) => {
                warn!(error = %err, "embedding generation failed, writing memory without one");
                None
            }
        }
    }

    /// Step 4: extraction + belief revision. Degrades to no facts on any
    /// provider error (spec §7).
    async fn extract_and_revise(&self, request: &RememberRequest, content: &str) -> Vec<RevisionResult> {
        let should_extract = request.extract_facts.unwrap_or(self.config.extract_facts_by_default);
        if !should_extract {
            return Vec::new();
        }
        let Some(llm) = self.llm.as_ref() else {
            return Vec::new();
        };
        let should_revise = request.belief_revision.unwrap_or(true);
        if !should_revise {
            return Vec::new();
        }

        let candidates = self
            .envelope
            .execute(Priority::High, "orchestrator:extract_facts", SEMAPHORE_TIMEOUT, STEP_DEADLINE, || async {
                Ok(crate::extract::extract_facts(llm.as_ref(), content).await)
            })
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "fact extraction envelope call failed, skipping extraction");
                Vec::new()
            });
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let mut fact = Fact::new(request.memory_space_id.clone(), candidate.text, candidate.fact_type, SourceType::Conversation);
            fact.user_id = request.user_id.clone();
            fact.participant_id = request.participant_id.clone();
            fact.triple.subject = candidate.subject;
            fact.triple.predicate = candidate.predicate;
            fact.confidence = candidate.confidence;

            match self.beliefs.revise(fact).await {
                Ok(result) => outcomes.push(result),
                Err(err) => warn!(error = %err, "belief revision failed for an extracted fact, skipping it"),
            }
        }
        outcomes
    }

    async fn build_memory(
        &self,
        request: &RememberRequest,
        conversation_id: &str,
        message_ids: &[String],
        content: String,
        embedding: Option<Vec<f32>>,
        primary_fact: Option<&Fact>,
    ) -> CortexResult<Memory> {
        let mut memory = Memory::new(request.memory_space_id.clone(), content, ContentType::Summarized, SourceType::Conversation);
        memory.user_id = request.user_id.clone();
        memory.agent_id = request.agent_id.clone();
        memory.participant_id = request.participant_id.clone();
        memory.embedding = embedding;
        memory.importance = request.importance.unwrap_or(self.config.default_importance);
        memory.tags = request.tags.clone();
        memory.conversation_ref = Some(ConversationRef {
            conversation_id: conversation_id.to_string(),
            message_ids: message_ids.to_vec(),
        });
        memory.facts_ref = primary_fact.map(|f| FactsRef {
            fact_id: f.fact_id.clone(),
            version: Some(f.version),
        });

        let to_store = memory.clone();
        self.envelope
            .execute(Priority::High, "orchestrator:create_memory", SEMAPHORE_TIMEOUT, STEP_DEADLINE, || async { self.storage.create_memory(&to_store).await })
            .await?;
        Ok(memory)
    }

    /// Step 5: enqueue, never fatal to the caller (spec §4.6, §7 graph
    /// failures degrade gracefully).
    async fn enqueue_graph_sync(&self, memory: &Memory) -> bool {
        if self.graph_adapter.is_none() {
            return false;
        }
        let entity = match serde_json::to_value(memory) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "failed to serialize memory for graph sync enqueue");
                return false;
            }
        };
        let outcome = self
            .envelope
            .execute(Priority::High, "orchestrator:enqueue_graph_sync", SEMAPHORE_TIMEOUT, STEP_DEADLINE, move || async move {
                self.storage.enqueue("memories", &memory.memory_id, GraphSyncOperation::Insert, entity, None).await
            })
            .await;
        match outcome {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "failed to enqueue graph sync entry");
                false
            }
        }
    }
}

fn enrich_content(request: &RememberRequest) -> String {
    match (&request.user_name, &request.agent_name) {
        (Some(user_name), Some(agent_name)) => format!("{user_name}: {}\n{agent_name}: {}", request.user_message, request.agent_response),
        _ => format!("{}\n{}", request.user_message, request.agent_response),
    }
}
