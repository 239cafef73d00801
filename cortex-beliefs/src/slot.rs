use cortex_core::errors::CortexResult;
use cortex_core::models::Fact;
use cortex_core::models::fact::canonicalize;
use cortex_core::traits::IFactStorage;

/// Stage 1 (spec §4.4): look up every active fact sharing the candidate's
/// slot key. A canonicalised exact match is a duplicate; any other active
/// fact in the slot is a conflict Stage 3 must adjudicate.
pub async fn find_slot_matches(
    storage: &(impl IFactStorage + ?Sized),
    memory_space_id: &str,
    slot_key: &str,
) -> CortexResult<Vec<Fact>> {
    let matches = storage.find_facts_by_slot_key(memory_space_id, slot_key).await?;
    Ok(matches.into_iter().filter(Fact::is_active).collect())
}

/// The first active fact in `matches` whose canonicalised text equals the
/// candidate's — an exact duplicate per spec §4.4 Stage 1.
pub fn exact_duplicate<'a>(matches: &'a [Fact], candidate: &Fact) -> Option<&'a Fact> {
    let target = canonicalize(&candidate.fact);
    matches.iter().find(|f| canonicalize(&f.fact) == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{FactType, SourceType};

    #[test]
    fn finds_canonicalised_duplicate() {
        let existing = Fact::new("space-1", "The user is now living in Boston", FactType::Knowledge, SourceType::Conversation);
        let candidate = Fact::new("space-1", "the user is living in boston", FactType::Knowledge, SourceType::Conversation);
        let matches = vec![existing.clone()];
        let found = exact_duplicate(&matches, &candidate).expect("duplicate found");
        assert_eq!(found.fact_id, existing.fact_id);
    }

    #[test]
    fn distinct_text_is_not_a_duplicate() {
        let existing = Fact::new("space-1", "likes tea", FactType::Preference, SourceType::Conversation);
        let candidate = Fact::new("space-1", "likes coffee", FactType::Preference, SourceType::Conversation);
        let matches = vec![existing];
        assert!(exact_duplicate(&matches, &candidate).is_none());
    }
}
