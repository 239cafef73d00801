use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Combination mode when a collection has more than one applicable
/// retention rule (spec §9 Open Questions: resolved as `Intersection`,
/// the stricter reading — a record is eligible for cleanup only once
/// every rule that names it agrees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RetentionCombineMode {
    Union,
    Intersection,
}

impl Default for RetentionCombineMode {
    fn default() -> Self {
        RetentionCombineMode::Intersection
    }
}

/// One retention rule applied to a collection (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionRule {
    pub max_versions: Option<usize>,
    pub max_age_ms: Option<i64>,
    pub max_count: Option<usize>,
    pub archive_before_delete: bool,
}

impl Default for RetentionRule {
    fn default() -> Self {
        Self {
            max_versions: None,
            max_age_ms: None,
            max_count: None,
            archive_before_delete: true,
        }
    }
}

/// Governance configuration: retention rules per collection plus the
/// GDPR cascade batch size (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub rules: HashMap<String, Vec<RetentionRule>>,
    pub combine_mode: RetentionCombineMode,
    pub gdpr_batch_size: usize,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            combine_mode: RetentionCombineMode::default(),
            gdpr_batch_size: defaults::DEFAULT_GDPR_BATCH_SIZE,
        }
    }
}
