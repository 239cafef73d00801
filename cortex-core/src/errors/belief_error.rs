/// Belief revision pipeline errors (C4).
#[derive(Debug, thiserror::Error)]
pub enum BeliefError {
    #[error("circular supersede chain detected for fact {fact_id}")]
    CircularSupersede { fact_id: String },

    #[error("LLM adjudication failed: {reason}")]
    AdjudicationFailed { reason: String },

    #[error("embedding required for semantic matching but none was produced")]
    MissingEmbedding,

    #[error("invalid slot: {reason}")]
    InvalidSlot { reason: String },
}
