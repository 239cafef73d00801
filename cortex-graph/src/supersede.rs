//! Acyclicity check for the fact supersede chain (spec §4.4 Stage 3,
//! §8 item 2). Facts form an arena addressed by `factId` with `supersedes`
//! as the backward index; cycle detection walks that chain with a bounded
//! depth and a visited set rather than building a full graph, since the
//! chain itself is never more than a linked list.

use std::collections::{HashMap, HashSet};

/// Would linking `new_fact_id.supersedes = old_fact_id` create a cycle in
/// the supersede chain? `supersedes` maps a fact id to the fact id it
/// directly supersedes, reflecting every link already committed.
pub fn would_create_cycle(
    supersedes: &HashMap<String, String>,
    new_fact_id: &str,
    old_fact_id: &str,
) -> bool {
    if new_fact_id == old_fact_id {
        return true;
    }

    let max_depth = supersedes.len() + 1;
    let mut visited = HashSet::new();
    let mut current = Some(old_fact_id.to_string());
    let mut depth = 0;

    while let Some(id) = current {
        if id == new_fact_id {
            return true;
        }
        if !visited.insert(id.clone()) {
            return true;
        }
        depth += 1;
        if depth > max_depth {
            return true;
        }
        current = supersedes.get(&id).cloned();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cycle_on_fresh_chain() {
        let supersedes = HashMap::new();
        assert!(!would_create_cycle(&supersedes, "new", "old"));
    }

    #[test]
    fn rejects_self_supersede() {
        let supersedes = HashMap::new();
        assert!(would_create_cycle(&supersedes, "a", "a"));
    }

    #[test]
    fn detects_cycle_through_existing_chain() {
        let mut supersedes = HashMap::new();
        // b supersedes a, c supersedes b: c -> b -> a.
        supersedes.insert("b".to_string(), "a".to_string());
        supersedes.insert("c".to_string(), "b".to_string());
        // Linking "a" to supersede "c" would close the loop a -> c -> b -> a.
        assert!(would_create_cycle(&supersedes, "a", "c"));
    }

    #[test]
    fn allows_extending_chain_without_cycle() {
        let mut supersedes = HashMap::new();
        supersedes.insert("b".to_string(), "a".to_string());
        assert!(!would_create_cycle(&supersedes, "c", "b"));
    }
}
