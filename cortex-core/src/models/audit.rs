use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who performed a mutation, for the ambient audit log (SPEC_FULL §B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActor {
    System,
    User(String),
    Agent(String),
}

/// What kind of mutation occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    Create,
    Update,
    Archive,
    Delete,
}

/// One row in the ambient per-collection audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub collection: String,
    pub entity_id: String,
    pub operation: AuditOperation,
    pub actor: AuditActor,
    pub detail: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
