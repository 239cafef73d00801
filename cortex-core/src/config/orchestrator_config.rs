use serde::{Deserialize, Serialize};

/// `remember`/`recall` facade configuration (spec §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Whether `remember` extracts candidate facts and routes them through
    /// belief revision when the caller doesn't say otherwise.
    pub extract_facts_by_default: bool,
    /// Whether `remember` computes an embedding for the new memory when
    /// the caller doesn't say otherwise.
    pub generate_embedding_by_default: bool,
    pub default_importance: u8,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            extract_facts_by_default: true,
            generate_embedding_by_default: true,
            default_importance: 50,
        }
    }
}
