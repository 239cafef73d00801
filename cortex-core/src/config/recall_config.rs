use serde::{Deserialize, Serialize};

use super::defaults;

/// Ranking weights for the recall engine's composite score (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub similarity: f64,
    pub importance: f64,
    pub confidence: f64,
    pub recency: f64,
    pub access: f64,
    pub multi_source: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            similarity: defaults::DEFAULT_WEIGHT_SIMILARITY,
            importance: defaults::DEFAULT_WEIGHT_IMPORTANCE,
            confidence: defaults::DEFAULT_WEIGHT_CONFIDENCE,
            recency: defaults::DEFAULT_WEIGHT_RECENCY,
            access: defaults::DEFAULT_WEIGHT_ACCESS,
            multi_source: defaults::DEFAULT_WEIGHT_MULTI_SOURCE,
        }
    }
}

/// Recall engine configuration (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub weights: RankingWeights,
    /// Half-life, in seconds, for the exponential recency decay.
    pub recency_half_life_secs: f64,
    /// `K` divisor in `log1p(accessCount) / K`.
    pub access_log_k: f64,
    pub default_top_k: usize,
    pub per_source_timeout_ms: u64,
    pub total_deadline_ms: u64,
    /// Facts: whether `includeSuperseded` defaults on.
    pub include_superseded_default: bool,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            recency_half_life_secs: defaults::DEFAULT_RECENCY_HALF_LIFE_SECS,
            access_log_k: defaults::DEFAULT_ACCESS_LOG_K,
            default_top_k: defaults::DEFAULT_TOP_K,
            per_source_timeout_ms: defaults::DEFAULT_PER_SOURCE_TIMEOUT_MS,
            total_deadline_ms: defaults::DEFAULT_TOTAL_DEADLINE_MS,
            include_superseded_default: false,
        }
    }
}
