use chrono::{DateTime, Utc};

use cortex_core::config::RankingWeights;

/// Exponential recency decay: `0.5` at exactly one half-life, approaching
/// `0` as age grows (spec §4.5 ranking formula).
pub fn recency_decay(age_secs: f64, half_life_secs: f64) -> f64 {
    if half_life_secs <= 0.0 {
        return 0.0;
    }
    (-std::f64::consts::LN_2 * age_secs / half_life_secs).exp()
}

/// The composite recall score (spec §4.5):
/// `w_sim*similarity + w_imp*(importance/100) + w_conf*(confidence/100)
///  + w_recency*recencyDecay(age) + w_access*log1p(accessCount)/K
///  + w_multi*(numSources-1)`.
#[allow(clippy::too_many_arguments)]
pub fn score(
    weights: &RankingWeights,
    similarity: f64,
    importance: u8,
    confidence: u8,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    access_count: u64,
    access_log_k: f64,
    half_life_secs: f64,
    num_sources: usize,
) -> f64 {
    let age_secs = (now - created_at).num_milliseconds().max(0) as f64 / 1000.0;
    weights.similarity * similarity
        + weights.importance * (importance as f64 / 100.0)
        + weights.confidence * (confidence as f64 / 100.0)
        + weights.recency * recency_decay(age_secs, half_life_secs)
        + weights.access * ((access_count as f64).ln_1p() / access_log_k.max(f64::EPSILON))
        + weights.multi_source * (num_sources.saturating_sub(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_item_decays_to_half_at_one_half_life() {
        let decay = recency_decay(3600.0, 3600.0);
        assert!((decay - 0.5).abs() < 1e-9);
    }

    #[test]
    fn higher_similarity_always_scores_higher_all_else_equal() {
        let weights = RankingWeights::default();
        let now = Utc::now();
        let low = score(&weights, 0.2, 50, 50, now, now, 0, 10.0, 604_800.0, 1);
        let high = score(&weights, 0.9, 50, 50, now, now, 0, 10.0, 604_800.0, 1);
        assert!(high > low);
    }

    #[test]
    fn multi_source_bonus_only_applies_beyond_the_first() {
        let weights = RankingWeights::default();
        let now = Utc::now();
        let one_source = score(&weights, 0.5, 50, 50, now, now, 0, 10.0, 604_800.0, 1);
        let two_sources = score(&weights, 0.5, 50, 50, now, now, 0, 10.0, 604_800.0, 2);
        assert!(two_sources > one_source);
    }
}
