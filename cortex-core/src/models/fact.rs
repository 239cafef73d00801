use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{FactType, SourceType};
use super::ids::new_id;

/// Optional subject/predicate/object triple attached to a fact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
}

/// Where a fact was sourced from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRef {
    pub conversation_id: Option<String>,
    pub message_ids: Option<Vec<String>>,
    pub memory_id: Option<String>,
}

/// Enrichment fields populated by extraction, kept open-ended per §9
/// ("dynamic metadata... stored verbatim").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactEnrichment {
    pub category: Option<String>,
    pub search_aliases: Vec<String>,
    pub semantic_context: Option<String>,
    pub entities: Vec<String>,
    pub relations: Vec<String>,
}

/// Optional validity window for time-scoped facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemporalWindow {
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Layer 3: a structured fact, subject to belief revision (spec §3, Fact).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub fact_id: String,
    pub memory_space_id: String,
    pub participant_id: Option<String>,
    pub user_id: Option<String>,
    pub fact: String,
    pub fact_type: FactType,
    pub triple: Triple,
    /// Embedding of `fact` (plus enrichment context), used for Stage 2
    /// semantic matching and `search_fact_candidates` (spec §4.4 Stage 2).
    pub embedding: Option<Vec<f32>>,
    /// Confidence in [0, 100].
    pub confidence: u8,
    pub source_type: SourceType,
    pub source_ref: Option<SourceRef>,
    pub tags: Vec<String>,
    pub enrichment: FactEnrichment,
    pub temporal_window: TemporalWindow,
    pub version: u64,
    /// Set once this fact has been superseded; an active fact has `None` here.
    pub superseded_by: Option<String>,
    /// The fact this one supersedes, if any.
    pub supersedes: Option<String>,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fact {
    pub fn new(memory_space_id: impl Into<String>, fact: impl Into<String>, fact_type: FactType, source_type: SourceType) -> Self {
        let now = Utc::now();
        Self {
            fact_id: new_id(),
            memory_space_id: memory_space_id.into(),
            participant_id: None,
            user_id: None,
            fact: fact.into(),
            fact_type,
            triple: Triple::default(),
            embedding: None,
            confidence: 70,
            source_type,
            source_ref: None,
            tags: Vec::new(),
            enrichment: FactEnrichment::default(),
            temporal_window: TemporalWindow::default(),
            version: 1,
            superseded_by: None,
            supersedes: None,
            tenant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active facts have not been superseded (spec §3, §GLOSSARY).
    pub fn is_active(&self) -> bool {
        self.superseded_by.is_none()
    }

    /// The logical slot this fact occupies for belief revision (spec §4.4,
    /// §GLOSSARY): `(userId, subject, predicate, factType)`, falling back to
    /// a canonicalised fact head when `predicate` is absent.
    pub fn slot_key(&self) -> String {
        let user = self.user_id.as_deref().unwrap_or("");
        let subject = self.triple.subject.as_deref().unwrap_or("");
        match self.triple.predicate.as_deref() {
            Some(predicate) => format!(
                "{user}|{subject}|{predicate}|{:?}",
                self.fact_type
            ),
            None => format!(
                "{user}|head:{}|{:?}",
                canonicalize(&self.fact),
                self.fact_type
            ),
        }
    }
}

/// Canonicalise a fact value for duplicate detection: lowercase, collapse
/// whitespace, strip a small stopword set (spec §4.4, Stage 1).
pub fn canonicalize(value: &str) -> String {
    const STOPWORDS: &[&str] = &[
        "a", "an", "the", "is", "are", "was", "were", "my", "your", "his", "her", "its", "our",
        "their", "to", "of", "in", "on", "at", "now",
    ];
    value
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
