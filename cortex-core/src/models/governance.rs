use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::new_id;

/// Result of one retention-policy run against a memory space (spec §4.8:
/// "a policy run records a `governanceEnforcement` row").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceEnforcement {
    pub id: String,
    pub memory_space_id: String,
    pub collection: String,
    pub versions_deleted: usize,
    pub records_purged: usize,
    pub storage_freed_bytes: usize,
    pub enforced_at: DateTime<Utc>,
}

impl GovernanceEnforcement {
    pub fn new(memory_space_id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            memory_space_id: memory_space_id.into(),
            collection: collection.into(),
            versions_deleted: 0,
            records_purged: 0,
            storage_freed_bytes: 0,
            enforced_at: Utc::now(),
        }
    }
}

/// Resumable work-queue entry for a GDPR cascade (spec §4.8: "a crash
/// mid-cascade leaves a work-queue entry that subsequent invocations
/// consume"). `pending_collections` shrinks as each collection's deletion
/// commits, so a retry only redoes the collections not yet confirmed done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdprCascadeJob {
    pub id: String,
    pub user_id: String,
    pub pending_collections: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GdprCascadeJob {
    pub fn new(user_id: impl Into<String>, pending_collections: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            pending_collections,
            created_at: now,
            updated_at: now,
        }
    }
}
