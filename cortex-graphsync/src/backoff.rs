use rand::Rng;

/// Exponential backoff with full jitter (spec §4.7: base 1 s, cap 5 min).
/// `attempt` is the 1-based failed-attempt count.
pub fn backoff_ms(attempt: u32, base_ms: u64, cap_ms: u64) -> u64 {
    let exp = base_ms.saturating_mul(1u64 << attempt.min(32));
    let capped = exp.min(cap_ms);
    rand::thread_rng().gen_range(0..=capped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_cap() {
        for attempt in 0..20 {
            let delay = backoff_ms(attempt, 1_000, 300_000);
            assert!(delay <= 300_000);
        }
    }

    #[test]
    fn grows_with_attempt_count_on_average() {
        let low: u64 = (0..100).map(|_| backoff_ms(1, 1_000, 300_000)).sum();
        let high: u64 = (0..100).map(|_| backoff_ms(8, 1_000, 300_000)).sum();
        assert!(high > low);
    }
}
