use serde::{Deserialize, Serialize};

use super::defaults;

/// Belief revision pipeline configuration (spec §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefRevisionConfig {
    /// Stage 2 nearest-neighbour similarity threshold.
    pub semantic_similarity_threshold: f64,
    /// Whether an LLM adjudicator is configured. When `false`, Stage 3 uses
    /// the deterministic fallback policy (spec §4.4, §9 Open Questions).
    pub llm_configured: bool,
}

impl Default for BeliefRevisionConfig {
    fn default() -> Self {
        Self {
            semantic_similarity_threshold: defaults::DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD,
            llm_configured: false,
        }
    }
}
