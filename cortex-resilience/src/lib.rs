//! Resilience envelope (C1): token-bucket rate limiting, priority-weighted
//! concurrency semaphore, and a circuit breaker, composed into the fixed
//! gate order every backend call must pass through.

mod circuit_breaker;
mod envelope;
mod priority_semaphore;
mod rate_limiter;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitMetrics};
pub use envelope::ResilienceEnvelope;
pub use priority_semaphore::{Permit, PrioritySemaphore};
pub use rate_limiter::TokenBucket;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cortex_core::config::ResilienceConfig;
    use cortex_core::errors::CortexError;
    use cortex_core::models::Priority;

    use super::*;

    fn test_config() -> ResilienceConfig {
        ResilienceConfig {
            tokens_per_second: 1_000,
            max_burst: Some(1_000),
            max_burst_multiplier: 2,
            semaphore_ceiling: 4,
            failure_threshold: 5,
            circuit_timeout_secs: 60,
            half_open_max: 3,
            success_threshold: 2,
        }
    }

    #[tokio::test]
    async fn closed_circuit_admits_calls() {
        let envelope = ResilienceEnvelope::new(&test_config());
        let result = envelope
            .execute(
                Priority::Normal,
                "memory:search",
                Duration::from_secs(1),
                Duration::from_secs(1),
                || async { Ok::<_, CortexError>(42) },
            )
            .await
            .unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn circuit_opens_after_threshold_failures() {
        let envelope = ResilienceEnvelope::new(&test_config());
        for _ in 0..5 {
            let err = envelope
                .execute(
                    Priority::Normal,
                    "memory:search",
                    Duration::from_secs(1),
                    Duration::from_secs(1),
                    || async {
                        Err::<(), CortexError>(
                            cortex_core::errors::StorageError::Backend {
                                message: "boom".into(),
                            }
                            .into(),
                        )
                    },
                )
                .await;
            assert!(err.is_err());
        }

        let sixth = envelope
            .execute(
                Priority::Normal,
                "memory:search",
                Duration::from_secs(1),
                Duration::from_secs(1),
                || async { Ok::<_, CortexError>(()) },
            )
            .await;
        assert!(matches!(
            sixth,
            Err(CortexError::Resilience(
                cortex_core::errors::ResilienceError::CircuitOpen { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn critical_priority_bypasses_open_circuit() {
        let envelope = ResilienceEnvelope::new(&test_config());
        for _ in 0..5 {
            let _ = envelope
                .execute(
                    Priority::Normal,
                    "gdpr:purge",
                    Duration::from_secs(1),
                    Duration::from_secs(1),
                    || async {
                        Err::<(), CortexError>(
                            cortex_core::errors::StorageError::Backend {
                                message: "boom".into(),
                            }
                            .into(),
                        )
                    },
                )
                .await;
        }

        let critical = envelope
            .execute(
                Priority::Critical,
                "gdpr:purge",
                Duration::from_secs(1),
                Duration::from_secs(1),
                || async { Ok::<_, CortexError>(()) },
            )
            .await;
        assert!(critical.is_ok());
    }

    #[tokio::test]
    async fn semaphore_rejects_beyond_ceiling_under_timeout() {
        let sem = PrioritySemaphore::new(1);
        let _held = sem.acquire(Priority::Normal, Duration::from_millis(50)).await.unwrap();
        let rejected = sem.acquire(Priority::Normal, Duration::from_millis(20)).await;
        assert!(rejected.is_err());
    }
}
