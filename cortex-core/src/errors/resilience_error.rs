/// Resilience envelope errors (C1).
#[derive(Debug, thiserror::Error)]
pub enum ResilienceError {
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("concurrency limit exceeded: semaphore wait timed out after {waited_ms}ms")]
    ConcurrencyTimeout { waited_ms: u64 },

    #[error("circuit open for operation class {operation}: retry after {retry_after_ms}ms")]
    CircuitOpen {
        operation: String,
        retry_after_ms: u64,
    },

    #[error("operation deadline of {deadline_ms}ms exceeded")]
    DeadlineExceeded { deadline_ms: u64 },
}
