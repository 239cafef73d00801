use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{MemorySpaceStatus, MemorySpaceType};
use super::ids::new_id;

/// Coordination registry entry for an isolation boundary (spec §3, §GLOSSARY
/// "Memory space").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySpace {
    pub memory_space_id: String,
    pub space_type: MemorySpaceType,
    pub participants: Vec<String>,
    pub status: MemorySpaceStatus,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemorySpace {
    pub fn new(space_type: MemorySpaceType) -> Self {
        let now = Utc::now();
        Self {
            memory_space_id: new_id(),
            space_type,
            participants: Vec::new(),
            status: MemorySpaceStatus::Active,
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
