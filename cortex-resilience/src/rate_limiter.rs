use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};

use cortex_core::errors::{CortexResult, ResilienceError};

/// Token-bucket rate limiter (spec §4.1). `Priority::Critical` callers
/// bypass this entirely at the envelope layer; every other class waits
/// here before acquiring a concurrency permit.
pub struct TokenBucket {
    limiter: Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TokenBucket {
    pub fn new(tokens_per_second: u32, max_burst: u32) -> Self {
        let rate = NonZeroU32::new(tokens_per_second.max(1)).expect("nonzero by construction");
        let burst = NonZeroU32::new(max_burst.max(1)).expect("nonzero by construction");
        let quota = Quota::per_second(rate).allow_burst(burst);
        Self {
            limiter: Arc::new(GovRateLimiter::direct(quota)),
        }
    }

    /// Wait for a token, aborting with `RateLimited` if the bucket cannot
    /// admit within `max_wait`.
    pub async fn acquire(&self, max_wait: Duration) -> CortexResult<()> {
        if self.limiter.check().is_ok() {
            return Ok(());
        }
        match tokio::time::timeout(max_wait, self.limiter.until_ready()).await {
            Ok(()) => Ok(()),
            Err(_) => Err(ResilienceError::RateLimited {
                retry_after_ms: max_wait.as_millis() as u64,
            }
            .into()),
        }
    }
}
