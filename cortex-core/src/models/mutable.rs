use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layer 1c: current-value record, no version history, updated under
/// optimistic concurrency (spec §3, Mutable). Key is `(namespace, key)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutableRecord {
    pub namespace: String,
    pub key: String,
    pub value: serde_json::Value,
    pub user_id: Option<String>,
    /// Monotonically incrementing token used for compare-and-swap updates.
    pub concurrency_token: u64,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MutableRecord {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, value: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value,
            user_id: None,
            concurrency_token: 0,
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
