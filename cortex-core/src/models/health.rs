use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Priority;

/// Circuit breaker state, mirrored for external health reporting
/// (spec §4.1 "Metrics exposed").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Snapshot of one (backend, operation-class) resilience pair, exposed for
/// tests and operator dashboards (spec §4.1, §9 "global state... explicit
/// and testable").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitMetrics {
    pub operation_class: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_state_change_at: DateTime<Utc>,
    pub total_opens: u64,
}

/// A coarse health report for the whole system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub circuits: Vec<CircuitMetrics>,
    pub in_flight_permits: usize,
    pub queue_depth_by_priority: Vec<(Priority, usize)>,
    pub generated_at: DateTime<Utc>,
}
