use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cortex_core::config::ResilienceConfig;
use cortex_core::errors::{CortexError, CortexResult, ResilienceError};
use cortex_core::models::Priority;

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitMetrics};
use crate::priority_semaphore::PrioritySemaphore;
use crate::rate_limiter::TokenBucket;

/// Wraps every backend call in the fixed gate order mandated by spec §4.1:
/// priority classification → circuit-breaker gate → semaphore acquire →
/// token-bucket wait → execute → release → record outcome.
///
/// `Priority::Critical` (GDPR/purge) bypasses the circuit breaker's open
/// state and the rate limiter, but still takes a concurrency permit ahead
/// of every other waiting class.
pub struct ResilienceEnvelope {
    semaphore: Arc<PrioritySemaphore>,
    rate_limiter: TokenBucket,
    circuit_breaker: CircuitBreaker,
}

impl ResilienceEnvelope {
    pub fn new(config: &ResilienceConfig) -> Self {
        Self {
            semaphore: PrioritySemaphore::new(config.effective_semaphore_ceiling()),
            rate_limiter: TokenBucket::new(config.tokens_per_second, config.effective_max_burst()),
            circuit_breaker: CircuitBreaker::new(CircuitBreakerConfig {
                failure_threshold: config.failure_threshold,
                timeout: Duration::from_secs(config.circuit_timeout_secs),
                half_open_max: config.half_open_max,
                success_threshold: config.success_threshold,
            }),
        }
    }

    pub fn metrics(&self) -> Vec<CircuitMetrics> {
        self.circuit_breaker.metrics()
    }

    pub async fn in_flight_permits(&self) -> usize {
        self.semaphore.in_flight().await
    }

    /// Run `op` through the envelope. `semaphore_timeout` bounds the
    /// concurrency wait; `deadline` bounds the whole call including `op`
    /// itself (spec §5 "every caller-facing operation accepts a deadline").
    pub async fn execute<F, Fut, T>(
        &self,
        priority: Priority,
        operation_class: &str,
        semaphore_timeout: Duration,
        deadline: Duration,
        op: F,
    ) -> CortexResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CortexResult<T>>,
    {
        if priority != Priority::Critical {
            self.circuit_breaker.check(operation_class)?;
        }

        let _permit = self.semaphore.acquire(priority, semaphore_timeout).await?;

        if priority != Priority::Critical {
            self.rate_limiter.acquire(semaphore_timeout).await?;
        }

        let result = tokio::time::timeout(deadline, op()).await;

        match result {
            Ok(Ok(value)) => {
                self.circuit_breaker.record_success(operation_class);
                Ok(value)
            }
            Ok(Err(err)) => {
                if is_backend_failure(&err) {
                    self.circuit_breaker.record_failure(operation_class);
                }
                Err(err)
            }
            Err(_) => {
                self.circuit_breaker.record_failure(operation_class);
                Err(ResilienceError::DeadlineExceeded {
                    deadline_ms: deadline.as_millis() as u64,
                }
                .into())
            }
        }
    }
}

/// Only backend/transport failures count toward the circuit breaker.
/// Validation and not-found outcomes are the caller's fault, not the
/// backend's, and must not trip the circuit (spec §4.1, §7).
fn is_backend_failure(err: &CortexError) -> bool {
    matches!(
        err,
        CortexError::Storage(cortex_core::errors::StorageError::Backend { .. })
            | CortexError::Provider(_)
            | CortexError::GraphSync(_)
    )
}
