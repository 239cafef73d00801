use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use cortex_core::errors::CortexResult;
use cortex_core::models::{GdprCascadeJob, Priority};
use cortex_core::traits::{
    IConversationStorage, IContextStorage, IFactHistoryStorage, IFactStorage, IGovernanceStorage,
    IGraphAdapter, IImmutableStorage, IMemoryStorage, IMutableStorage,
};
use cortex_resilience::ResilienceEnvelope;

const SEMAPHORE_TIMEOUT: Duration = Duration::from_secs(2);
const DEADLINE: Duration = Duration::from_secs(30);

/// The collections spec §4.8 names for the cascade. `sessions` has no
/// collection of its own in this schema; `contexts` is the closest analog
/// (a context tree is this system's session) so it stands in for it here.
/// `graph_sync_queue` rows carry no user identity, so that step always
/// reports 0 deletions and exists only so every spec-named collection
/// appears in the job.
const CASCADE_COLLECTIONS: &[&str] = &[
    "conversations",
    "immutable",
    "mutable",
    "memories",
    "facts",
    "fact_history",
    "contexts",
    "graph_sync_queue",
];

/// Per-collection row counts deleted by one cascade run.
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    pub user_id: String,
    pub deleted: HashMap<String, usize>,
}

/// Deletes every record keyed by a `userId` across the collections spec
/// §4.8 names, resumably: progress is persisted after each collection so a
/// crash mid-cascade can be picked back up by calling [`GdprCascade::run`]
/// again with the same `user_id`.
pub struct GdprCascade<S, G> {
    storage: Arc<S>,
    graph_adapter: Option<Arc<G>>,
    envelope: Arc<ResilienceEnvelope>,
}

impl<S, G> GdprCascade<S, G>
where
    S: IConversationStorage
        + IImmutableStorage
        + IMutableStorage
        + IMemoryStorage
        + IFactStorage
        + IFactHistoryStorage
        + IContextStorage
        + IGovernanceStorage
        + 'static,
    G: IGraphAdapter + 'static,
{
    pub fn new(storage: Arc<S>, graph_adapter: Option<Arc<G>>, envelope: Arc<ResilienceEnvelope>) -> Self {
        Self { storage, graph_adapter, envelope }
    }

    pub async fn run(&self, user_id: &str) -> CortexResult<CascadeReport> {
        let mut job = match self.storage.get_cascade_job(user_id).await? {
            Some(job) => {
                info!(user_id, remaining = job.pending_collections.len(), "resuming interrupted GDPR cascade");
                job
            }
            None => {
                let job = GdprCascadeJob::new(user_id, CASCADE_COLLECTIONS.iter().map(|s| s.to_string()).collect());
                self.storage.create_cascade_job(&job).await?;
                job
            }
        };

        let mut report = CascadeReport {
            user_id: user_id.to_string(),
            deleted: HashMap::new(),
        };

        while let Some(collection) = job.pending_collections.first().cloned() {
            let count = self.delete_collection(&collection, user_id).await?;
            report.deleted.insert(collection.clone(), count);
            job.pending_collections.remove(0);
            job.updated_at = Utc::now();
            self.storage.update_cascade_job(&job).await?;
        }

        if self.graph_adapter.is_some() {
            warn!(
                user_id,
                "graph adapter configured but IGraphAdapter exposes no delete-by-property \
                 operation; graph-side cascade for this user must be handled by the adapter's \
                 own retention policy"
            );
        }

        self.storage.delete_cascade_job(&job.id).await?;
        info!(user_id, deleted = ?report.deleted, "GDPR cascade complete");
        Ok(report)
    }

    async fn delete_collection(&self, collection: &str, user_id: &str) -> CortexResult<usize> {
        let user_id = user_id.to_string();
        self.envelope
            .execute(Priority::Critical, "governance:gdpr_cascade", SEMAPHORE_TIMEOUT, DEADLINE, move || async move {
                match collection {
                    "conversations" => self.storage.delete_conversations_for_user(&user_id).await,
                    "immutable" => self.storage.delete_immutable_for_user(&user_id).await,
                    "mutable" => self.storage.delete_mutable_for_user(&user_id).await,
                    "memories" => self.storage.delete_memories_for_user(&user_id).await,
                    "facts" => self.storage.delete_facts_for_user(&user_id).await,
                    "fact_history" => self.storage.delete_for_user(&user_id).await,
                    "contexts" => self.storage.delete_contexts_for_user(&user_id).await,
                    "graph_sync_queue" => Ok(0),
                    other => unreachable!("unknown cascade collection {other}"),
                }
            })
            .await
    }
}
