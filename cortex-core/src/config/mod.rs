//! Typed configuration for the Cortex system, composed from TOML with
//! field-level defaults (`#[serde(default)]`) so a partial config file
//! only needs to name the values it wants to override.

pub mod defaults;

mod belief_config;
mod governance_config;
mod graphsync_config;
mod orchestrator_config;
mod recall_config;
mod resilience_config;
mod storage_config;

pub use belief_config::BeliefRevisionConfig;
pub use governance_config::{GovernanceConfig, RetentionCombineMode, RetentionRule};
pub use graphsync_config::GraphSyncConfig;
pub use orchestrator_config::OrchestratorConfig;
pub use recall_config::{RankingWeights, RecallConfig};
pub use resilience_config::ResilienceConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::CortexError;

/// Top-level configuration composing every subsystem's config block.
///
/// Loaded from a TOML file via [`CortexConfig::from_toml_str`] or
/// [`CortexConfig::from_file`]; any section omitted from the source
/// document falls back to its `Default` impl.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexConfig {
    pub resilience: ResilienceConfig,
    pub storage: StorageConfig,
    pub belief_revision: BeliefRevisionConfig,
    pub recall: RecallConfig,
    pub graph_sync: GraphSyncConfig,
    pub governance: GovernanceConfig,
    pub orchestrator: OrchestratorConfig,
}

impl CortexConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, CortexError> {
        toml::from_str(raw).map_err(|e| CortexError::Validation {
            reason: format!("invalid config: {e}"),
        })
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, CortexError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CortexError::Validation {
            reason: format!("cannot read config file {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&raw)
    }
}
