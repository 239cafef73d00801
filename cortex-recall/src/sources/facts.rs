use cortex_core::errors::CortexResult;
use cortex_core::models::Fact;
use cortex_core::traits::IFactStorage;

/// Facts keyword source: a document-store backend has no full-text index,
/// so this scores active facts by the fraction of query tokens their text
/// contains (spec §4.5 "Facts full-text search").
pub async fn search_facts(
    storage: &(impl IFactStorage + ?Sized),
    memory_space_id: &str,
    query_text: &str,
    include_superseded: bool,
    limit: usize,
) -> CortexResult<Vec<(Fact, f64)>> {
    let tokens: Vec<String> = query_text
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let facts = storage.list_facts_by_space(memory_space_id, include_superseded).await?;
    let mut scored: Vec<(Fact, f64)> = facts
        .into_iter()
        .filter_map(|fact| {
            let haystack = fact.fact.to_lowercase();
            let hits = tokens.iter().filter(|t| haystack.contains(t.as_str())).count();
            if hits == 0 {
                None
            } else {
                Some((fact, hits as f64 / tokens.len() as f64))
            }
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{FactType, SourceType};

    #[test]
    fn scores_by_token_overlap() {
        let f1 = Fact::new("space-1", "likes black coffee in the morning", FactType::Preference, SourceType::Conversation);
        let f2 = Fact::new("space-1", "dislikes tea", FactType::Preference, SourceType::Conversation);
        let tokens: Vec<&str> = "likes coffee".split_whitespace().collect();
        let hits_f1 = tokens.iter().filter(|t| f1.fact.to_lowercase().contains(*t)).count();
        let hits_f2 = tokens.iter().filter(|t| f2.fact.to_lowercase().contains(*t)).count();
        assert!(hits_f1 > hits_f2);
    }
}
