use crate::RecallResult;

enum Item<'a> {
    Memory(&'a str),
    Fact(&'a str),
}

/// Concatenate the top-`top_k` results (memories and facts interleaved by
/// score) into a single prompt-ready string (spec §4.5 "context-string
/// helper"). `top_k` defaults to the caller's configured `default_top_k`.
pub fn to_context_string(result: &RecallResult, top_k: usize) -> String {
    let mut items: Vec<(Item, f64)> = Vec::with_capacity(result.memories.len() + result.facts.len());
    items.extend(result.memories.iter().map(|(m, score)| (Item::Memory(m.content.as_str()), *score)));
    items.extend(result.facts.iter().map(|(f, score)| (Item::Fact(f.fact.as_str()), *score)));
    items.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    items
        .into_iter()
        .take(top_k)
        .map(|(item, _)| match item {
            Item::Memory(text) => format!("[memory] {text}"),
            Item::Fact(text) => format!("[fact] {text}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{ContentType, Fact, FactType, Memory, SourceType};

    #[test]
    fn orders_by_score_across_collections() {
        let mut result = RecallResult::default();
        result.memories.push((Memory::new("space-1", "low score memory", ContentType::Raw, SourceType::Conversation), 0.2));
        result.facts.push((Fact::new("space-1", "high score fact", FactType::Knowledge, SourceType::Conversation), 0.9));

        let text = to_context_string(&result, 10);
        assert!(text.starts_with("[fact] high score fact"));
    }

    #[test]
    fn truncates_to_top_k() {
        let mut result = RecallResult::default();
        for i in 0..5 {
            result
                .memories
                .push((Memory::new("space-1", format!("memory {i}"), ContentType::Raw, SourceType::Conversation), i as f64));
        }
        let text = to_context_string(&result, 2);
        assert_eq!(text.lines().count(), 2);
    }
}
