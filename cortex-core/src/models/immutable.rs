use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One prior state retained by the bounded history list (spec §3, Immutable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmutableVersionSnapshot {
    pub version: u64,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Layer 1b: versioned, NOT memory-space-scoped, truly shared record.
/// Key is the compound `(record_type, id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmutableRecord {
    pub record_type: String,
    pub id: String,
    pub data: serde_json::Value,
    pub user_id: Option<String>,
    pub version: u64,
    pub previous_versions: Vec<ImmutableVersionSnapshot>,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImmutableRecord {
    pub fn new(record_type: impl Into<String>, id: impl Into<String>, data: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            record_type: record_type.into(),
            id: id.into(),
            data,
            user_id: None,
            version: 1,
            previous_versions: Vec::new(),
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a new value, snapshotting the prior state and bumping `version`.
    /// Trims the oldest snapshot if `previous_versions` exceeds `retention`
    /// (spec §4.2 versioning contract).
    pub fn store(&mut self, data: serde_json::Value, retention: usize) {
        self.previous_versions.push(ImmutableVersionSnapshot {
            version: self.version,
            data: std::mem::replace(&mut self.data, data),
            timestamp: self.updated_at,
        });
        self.version += 1;
        self.updated_at = Utc::now();
        while self.previous_versions.len() > retention {
            self.previous_versions.remove(0);
        }
    }

    pub fn get_version(&self, version: u64) -> Option<serde_json::Value> {
        if version == self.version {
            return Some(self.data.clone());
        }
        self.previous_versions
            .iter()
            .find(|snap| snap.version == version)
            .map(|snap| snap.data.clone())
    }
}
