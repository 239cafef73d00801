use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ContentType, SourceType};
use super::ids::new_id;
use crate::errors::{CortexResult, StorageError};

/// Back-reference to the conversation a memory was distilled from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRef {
    pub conversation_id: String,
    pub message_ids: Vec<String>,
}

/// Back-reference to the immutable snapshot a memory was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmutableRef {
    pub record_type: String,
    pub id: String,
    pub version: Option<u64>,
}

/// Back-reference to a mutable record, carrying a point-in-time snapshot
/// since mutable records have no version history of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutableRef {
    pub namespace: String,
    pub key: String,
    pub snapshot_value: serde_json::Value,
    pub snapshot_at: DateTime<Utc>,
}

/// Back-reference to the currently-active fact at write time. Per spec §4.3,
/// this link is never rewritten on supersede; resolvers must walk
/// `Fact.superseded_by` to reach the current active fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsRef {
    pub fact_id: String,
    pub version: Option<u64>,
}

/// One prior state of a memory, retained for `retention` updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryVersionSnapshot {
    pub version: u64,
    pub content: String,
    pub embedding: Option<Vec<f32>>,
    pub importance: u8,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Layer 2: a searchable, embeddable unit of memory (spec §3, Memory).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub memory_id: String,
    pub memory_space_id: String,
    pub participant_id: Option<String>,
    pub content: String,
    pub content_type: ContentType,
    pub embedding: Option<Vec<f32>>,
    pub source_type: SourceType,
    pub message_role: Option<String>,
    pub user_id: Option<String>,
    pub agent_id: Option<String>,
    pub conversation_ref: Option<ConversationRef>,
    pub immutable_ref: Option<ImmutableRef>,
    pub mutable_ref: Option<MutableRef>,
    pub facts_ref: Option<FactsRef>,
    /// Flat, indexable importance in [0, 100] (spec §3 invariant: never nested
    /// in metadata so it stays indexable).
    pub importance: u8,
    pub tags: Vec<String>,
    pub version: u64,
    pub previous_versions: Vec<MemoryVersionSnapshot>,
    pub access_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Memory {
    pub fn new(memory_space_id: impl Into<String>, content: impl Into<String>, content_type: ContentType, source_type: SourceType) -> Self {
        let now = Utc::now();
        Self {
            memory_id: new_id(),
            memory_space_id: memory_space_id.into(),
            participant_id: None,
            content: content.into(),
            content_type,
            embedding: None,
            source_type,
            message_role: None,
            user_id: None,
            agent_id: None,
            conversation_ref: None,
            immutable_ref: None,
            mutable_ref: None,
            facts_ref: None,
            importance: 50,
            tags: Vec::new(),
            version: 1,
            previous_versions: Vec::new(),
            access_count: 0,
            last_accessed: None,
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the `embedding` length against the collection's configured
    /// dimension (spec §3 invariant).
    pub fn validate_embedding_dim(&self, dim: usize) -> CortexResult<()> {
        if let Some(ref embedding) = self.embedding {
            if embedding.len() != dim {
                return Err(StorageError::EmbeddingDimensionMismatch {
                    expected: dim,
                    actual: embedding.len(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Snapshot the current mutable fields, apply new content, bump version,
    /// and trim to `retention` (spec §4.2 versioning contract).
    pub fn update_content(&mut self, new_content: String, new_embedding: Option<Vec<f32>>, retention: usize) {
        self.previous_versions.push(MemoryVersionSnapshot {
            version: self.version,
            content: std::mem::replace(&mut self.content, new_content),
            embedding: self.embedding.clone(),
            importance: self.importance,
            tags: self.tags.clone(),
            timestamp: self.updated_at,
        });
        if new_embedding.is_some() {
            self.embedding = new_embedding;
        }
        self.version += 1;
        self.updated_at = Utc::now();
        while self.previous_versions.len() > retention {
            self.previous_versions.remove(0);
        }
    }

    pub fn record_access(&mut self) {
        self.access_count += 1;
        self.last_accessed = Some(Utc::now());
    }
}
