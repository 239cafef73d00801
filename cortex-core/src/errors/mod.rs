//! Error taxonomy (spec §7). Every public fallible operation in the
//! workspace returns [`CortexResult`].

mod belief_error;
mod governance_error;
mod graphsync_error;
mod recall_error;
mod resilience_error;
mod storage_error;

pub use belief_error::BeliefError;
pub use governance_error::GovernanceError;
pub use graphsync_error::GraphSyncError;
pub use recall_error::RecallError;
pub use resilience_error::ResilienceError;
pub use storage_error::StorageError;

/// Provider-facing errors: an LLM or embedding call that failed.
/// Orchestrator degrades gracefully on this kind unless the caller marked
/// the call required (spec §7).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("embedding provider '{provider}' failed: {reason}")]
    Embedding { provider: String, reason: String },

    #[error("LLM provider '{provider}' failed: {reason}")]
    Llm { provider: String, reason: String },
}

/// The union of every error kind raised anywhere in the workspace.
///
/// Validation and NotFound surface synchronously; transient backend
/// errors are retried inside the resilience envelope before reaching
/// here; logical-integrity errors (circular supersede, governance
/// violations) never retry.
#[derive(Debug, thiserror::Error)]
pub enum CortexError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Resilience(#[from] ResilienceError),

    #[error(transparent)]
    Belief(#[from] BeliefError),

    #[error(transparent)]
    Recall(#[from] RecallError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    GraphSync(#[from] GraphSyncError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("invalid argument: {reason}")]
    Validation { reason: String },

    #[error("deadline exceeded")]
    Deadline,
}

/// Result alias used throughout the workspace.
pub type CortexResult<T> = Result<T, CortexError>;
