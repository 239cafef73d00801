use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::GraphSyncOperation;
use super::ids::new_id;

/// One mutation queued for mirroring to the native graph store (spec §3,
/// Graph sync queue; §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSyncQueueEntry {
    pub id: String,
    pub table: String,
    pub entity_id: String,
    pub operation: GraphSyncOperation,
    pub entity: Option<serde_json::Value>,
    pub synced: bool,
    pub failed_attempts: u32,
    pub last_error: Option<String>,
    /// Epoch-ms time the worker should next attempt this row (exponential
    /// backoff with full jitter, spec §4.7).
    pub next_attempt_at: DateTime<Utc>,
    pub dead_lettered: bool,
    pub priority: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GraphSyncQueueEntry {
    pub fn new(table: impl Into<String>, entity_id: impl Into<String>, operation: GraphSyncOperation, entity: Option<serde_json::Value>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            table: table.into(),
            entity_id: entity_id.into(),
            operation,
            entity,
            synced: false,
            failed_attempts: 0,
            last_error: None,
            next_attempt_at: now,
            dead_lettered: false,
            priority: None,
            created_at: now,
            updated_at: now,
        }
    }
}
