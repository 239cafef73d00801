/// Storage-layer errors (C2: conversations, immutable, mutable, memories, facts).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("not found: {collection} {id}")]
    NotFound { collection: String, id: String },

    #[error("optimistic concurrency conflict on {collection} {id} after {attempts} attempts")]
    Conflict {
        collection: String,
        id: String,
        attempts: u32,
    },

    #[error("SQLite error: {message}")]
    Backend { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimensionMismatch { expected: usize, actual: usize },

    #[error("message ids {missing:?} do not exist in conversation {conversation_id}")]
    DanglingMessageRefs {
        conversation_id: String,
        missing: Vec<String>,
    },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend {
            message: err.to_string(),
        }
    }
}
