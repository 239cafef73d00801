use cortex_core::errors::CortexResult;
use cortex_core::models::Fact;
use cortex_core::traits::IFactStorage;

/// Stage 2 (spec §4.4): nearest-neighbour search among active facts in the
/// memory space, returning the closest match at or above
/// `similarity_threshold`. Facts already superseded never participate —
/// `search_fact_candidates` only scans rows written with an embedding, and
/// callers filter to `is_active()` here since a superseded fact can still
/// carry one.
pub async fn nearest_active_match(
    storage: &(impl IFactStorage + ?Sized),
    memory_space_id: &str,
    embedding: &[f32],
    similarity_threshold: f64,
    candidate_pool: usize,
) -> CortexResult<Option<(Fact, f64)>> {
    let candidates = storage
        .search_fact_candidates(memory_space_id, embedding, candidate_pool)
        .await?;
    Ok(candidates
        .into_iter()
        .find(|(fact, score)| fact.is_active() && *score >= similarity_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_active_match_above_threshold() {
        // Pure filter logic exercised directly; the storage round trip is
        // covered by the pipeline integration tests.
        let candidates = vec![(
            cortex_core::models::Fact::new(
                "space-1",
                "likes tea",
                cortex_core::models::FactType::Preference,
                cortex_core::models::SourceType::Conversation,
            ),
            0.91,
        )];
        let found = candidates
            .into_iter()
            .find(|(fact, score)| fact.is_active() && *score >= 0.88);
        assert!(found.is_some());
    }
}
