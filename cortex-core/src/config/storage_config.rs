use serde::{Deserialize, Serialize};

use super::defaults;

/// Storage primitives configuration (spec §3, §4.2, §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub embedding_dim: usize,
    pub memory_version_retention: usize,
    pub immutable_version_retention: usize,
    pub context_version_retention: usize,
    pub conflict_retry_count: u32,
    pub idempotency_window_secs: i64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            embedding_dim: defaults::DEFAULT_EMBEDDING_DIM,
            memory_version_retention: defaults::DEFAULT_MEMORY_RETENTION,
            immutable_version_retention: defaults::DEFAULT_IMMUTABLE_RETENTION,
            context_version_retention: defaults::DEFAULT_CONTEXT_RETENTION,
            conflict_retry_count: defaults::DEFAULT_CONFLICT_RETRIES,
            idempotency_window_secs: defaults::DEFAULT_IDEMPOTENCY_WINDOW_SECS,
        }
    }
}
