use serde::{Deserialize, Serialize};

use super::defaults;

/// Graph sync worker configuration (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSyncConfig {
    pub max_sync_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_cap_ms: u64,
    /// How long a synced, non-dead-lettered entry lingers before the
    /// worker reaps it from `graphSyncQueue`.
    pub synced_retention_secs: i64,
}

impl Default for GraphSyncConfig {
    fn default() -> Self {
        Self {
            max_sync_attempts: defaults::DEFAULT_MAX_SYNC_ATTEMPTS,
            backoff_base_ms: defaults::DEFAULT_BACKOFF_BASE_MS,
            backoff_cap_ms: defaults::DEFAULT_BACKOFF_CAP_MS,
            synced_retention_secs: defaults::DEFAULT_SYNCED_RETENTION_SECS,
        }
    }
}
