/// Recall engine errors (C5).
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    #[error("source '{source_name}' timed out after {elapsed_ms}ms")]
    SourceTimeout { source_name: String, elapsed_ms: u64 },

    #[error("source '{source_name}' failed: {reason}")]
    SourceFailed { source_name: String, reason: String },

    #[error("total recall deadline of {deadline_ms}ms exceeded")]
    DeadlineExceeded { deadline_ms: u64 },

    #[error("no embedding available and vector search was requested")]
    MissingEmbedding,
}
