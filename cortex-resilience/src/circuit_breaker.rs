use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use cortex_core::errors::{CortexResult, ResilienceError};
use cortex_core::models::CircuitState as PublicCircuitState;

/// Per-(backend, operation-class) circuit breaker state (spec §4.1).
#[derive(Debug, Clone)]
enum State {
    Closed { consecutive_failures: u32 },
    Open { tripped_at: Instant },
    HalfOpen { probes_in_flight: u32, consecutive_successes: u32 },
}

impl Default for State {
    fn default() -> Self {
        State::Closed {
            consecutive_failures: 0,
        }
    }
}

struct Entry {
    state: State,
    last_failure_at: Option<DateTime<Utc>>,
    last_state_change_at: DateTime<Utc>,
    total_opens: u64,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            state: State::default(),
            last_failure_at: None,
            last_state_change_at: Utc::now(),
            total_opens: 0,
        }
    }
}

pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub timeout: Duration,
    pub half_open_max: u32,
    pub success_threshold: u32,
}

/// Metrics snapshot for one operation class (spec §4.1 "Metrics exposed").
#[derive(Debug, Clone)]
pub struct CircuitMetrics {
    pub operation_class: String,
    pub state: PublicCircuitState,
    pub consecutive_failures: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_state_change_at: DateTime<Utc>,
    pub total_opens: u64,
}

/// Tracks failures per operation class and trips to `Open` on
/// `failureThreshold` consecutive failures; admits `halfOpenMax` probes
/// after `timeout` elapses, closing again on `successThreshold`
/// consecutive successes (spec §4.1).
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    entries: Mutex<HashMap<String, Entry>>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Gate a call: `Ok(())` admits it (Closed, or a HalfOpen probe slot);
    /// `Err(CircuitOpen)` rejects it with the remaining cooldown.
    pub fn check(&self, operation_class: &str) -> CortexResult<()> {
        let mut entries = self.entries.lock().expect("circuit breaker mutex poisoned");
        let entry = entries.entry(operation_class.to_string()).or_default();

        match &mut entry.state {
            State::Closed { .. } => Ok(()),
            State::Open { tripped_at } => {
                let elapsed = tripped_at.elapsed();
                if elapsed >= self.config.timeout {
                    info!(operation_class, "circuit transitioning to half-open");
                    entry.state = State::HalfOpen {
                        probes_in_flight: 1,
                        consecutive_successes: 0,
                    };
                    entry.last_state_change_at = Utc::now();
                    Ok(())
                } else {
                    Err(ResilienceError::CircuitOpen {
                        operation: operation_class.to_string(),
                        retry_after_ms: (self.config.timeout - elapsed).as_millis() as u64,
                    }
                    .into())
                }
            }
            State::HalfOpen { probes_in_flight, .. } => {
                if *probes_in_flight < self.config.half_open_max {
                    *probes_in_flight += 1;
                    Ok(())
                } else {
                    Err(ResilienceError::CircuitOpen {
                        operation: operation_class.to_string(),
                        retry_after_ms: 0,
                    }
                    .into())
                }
            }
        }
    }

    pub fn record_success(&self, operation_class: &str) {
        let mut entries = self.entries.lock().expect("circuit breaker mutex poisoned");
        let entry = entries.entry(operation_class.to_string()).or_default();

        match &mut entry.state {
            State::Closed { consecutive_failures } => {
                *consecutive_failures = 0;
            }
            State::HalfOpen {
                consecutive_successes,
                ..
            } => {
                *consecutive_successes += 1;
                if *consecutive_successes >= self.config.success_threshold {
                    info!(operation_class, "circuit closed after half-open recovery");
                    entry.state = State::Closed {
                        consecutive_failures: 0,
                    };
                    entry.last_state_change_at = Utc::now();
                }
            }
            State::Open { .. } => {}
        }
    }

    pub fn record_failure(&self, operation_class: &str) {
        let mut entries = self.entries.lock().expect("circuit breaker mutex poisoned");
        let entry = entries.entry(operation_class.to_string()).or_default();
        entry.last_failure_at = Some(Utc::now());

        match &mut entry.state {
            State::Closed { consecutive_failures } => {
                *consecutive_failures += 1;
                if *consecutive_failures >= self.config.failure_threshold {
                    warn!(operation_class, "circuit opened");
                    entry.state = State::Open {
                        tripped_at: Instant::now(),
                    };
                    entry.last_state_change_at = Utc::now();
                    entry.total_opens += 1;
                }
            }
            State::HalfOpen { .. } => {
                warn!(operation_class, "half-open probe failed, circuit reopened");
                entry.state = State::Open {
                    tripped_at: Instant::now(),
                };
                entry.last_state_change_at = Utc::now();
                entry.total_opens += 1;
            }
            State::Open { .. } => {}
        }
    }

    pub fn metrics(&self) -> Vec<CircuitMetrics> {
        let entries = self.entries.lock().expect("circuit breaker mutex poisoned");
        entries
            .iter()
            .map(|(class, entry)| {
                let (state, consecutive_failures) = match &entry.state {
                    State::Closed { consecutive_failures } => {
                        (PublicCircuitState::Closed, *consecutive_failures)
                    }
                    State::Open { .. } => (PublicCircuitState::Open, 0),
                    State::HalfOpen { .. } => (PublicCircuitState::HalfOpen, 0),
                };
                CircuitMetrics {
                    operation_class: class.clone(),
                    state,
                    consecutive_failures,
                    last_failure_at: entry.last_failure_at,
                    last_state_change_at: entry.last_state_change_at,
                    total_opens: entry.total_opens,
                }
            })
            .collect()
    }
}
