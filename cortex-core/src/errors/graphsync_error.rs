/// Graph sync worker errors (C7).
#[derive(Debug, thiserror::Error)]
pub enum GraphSyncError {
    #[error("graph adapter not configured")]
    AdapterNotConfigured,

    #[error("adapter call failed for {entity_id}: {reason}")]
    AdapterFailed { entity_id: String, reason: String },

    #[error("record {entity_id} moved to dead-letter after {attempts} attempts")]
    DeadLettered { entity_id: String, attempts: u32 },
}
