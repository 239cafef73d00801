use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::FactHistoryAction;
use super::ids::new_id;

/// Which pipeline stages ran to produce a fact history event (spec §3,
/// §4.4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineFlags {
    pub slot_matching: bool,
    pub semantic_matching: bool,
    pub llm_resolution: bool,
}

/// Append-only audit of every CREATE/UPDATE/SUPERSEDE/DELETE on a fact
/// (spec §3, Fact history). Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactHistoryEntry {
    pub event_id: String,
    pub fact_id: String,
    pub memory_space_id: String,
    pub action: FactHistoryAction,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub superseded_by: Option<String>,
    pub supersedes: Option<String>,
    pub reason: Option<String>,
    pub confidence: Option<u8>,
    pub pipeline: PipelineFlags,
    pub user_id: Option<String>,
    pub participant_id: Option<String>,
    pub conversation_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl FactHistoryEntry {
    pub fn new(fact_id: impl Into<String>, memory_space_id: impl Into<String>, action: FactHistoryAction) -> Self {
        Self {
            event_id: new_id(),
            fact_id: fact_id.into(),
            memory_space_id: memory_space_id.into(),
            action,
            old_value: None,
            new_value: None,
            superseded_by: None,
            supersedes: None,
            reason: None,
            confidence: None,
            pipeline: PipelineFlags::default(),
            user_id: None,
            participant_id: None,
            conversation_id: None,
            timestamp: Utc::now(),
        }
    }
}
