use serde::{Deserialize, Serialize};

use super::defaults;

/// Resilience envelope configuration (spec §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Token-bucket refill rate.
    pub tokens_per_second: u32,
    /// Bucket capacity. `None` means `tokens_per_second * max_burst_multiplier`.
    pub max_burst: Option<u32>,
    pub max_burst_multiplier: u32,
    /// Concurrency semaphore ceiling, clamped to `MAX_SEMAPHORE_CEILING`.
    pub semaphore_ceiling: usize,
    pub failure_threshold: u32,
    pub circuit_timeout_secs: u64,
    pub half_open_max: u32,
    pub success_threshold: u32,
}

impl ResilienceConfig {
    pub fn effective_max_burst(&self) -> u32 {
        self.max_burst
            .unwrap_or(self.tokens_per_second * self.max_burst_multiplier)
    }

    pub fn effective_semaphore_ceiling(&self) -> usize {
        self.semaphore_ceiling.min(defaults::MAX_SEMAPHORE_CEILING)
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            tokens_per_second: defaults::DEFAULT_TOKENS_PER_SECOND,
            max_burst: None,
            max_burst_multiplier: defaults::DEFAULT_MAX_BURST_MULTIPLIER,
            semaphore_ceiling: defaults::DEFAULT_SEMAPHORE_CEILING,
            failure_threshold: defaults::DEFAULT_FAILURE_THRESHOLD,
            circuit_timeout_secs: defaults::DEFAULT_CIRCUIT_TIMEOUT_SECS,
            half_open_max: defaults::DEFAULT_HALF_OPEN_MAX,
            success_threshold: defaults::DEFAULT_SUCCESS_THRESHOLD,
        }
    }
}
