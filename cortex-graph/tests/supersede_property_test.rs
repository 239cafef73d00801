//! Property coverage for the supersede-chain acyclicity invariant
//! (spec §4.4 Stage 3, §8 item 2): "for any fact F, following
//! `F.supersededBy` terminates (no cycles)".

use std::collections::HashMap;

use cortex_graph::supersede::would_create_cycle;
use proptest::prelude::*;

/// Build a linear chain `fact-1 supersedes fact-0`, `fact-2 supersedes
/// fact-1`, ... of the given length, returning the `supersedes` index and
/// the id of the current tail (the most recently created fact).
fn build_chain(len: usize) -> (HashMap<String, String>, String) {
    let mut supersedes = HashMap::new();
    for i in 1..len {
        supersedes.insert(format!("fact-{i}"), format!("fact-{}", i - 1));
    }
    (supersedes, format!("fact-{}", len.saturating_sub(1)))
}

proptest! {
    #[test]
    fn extending_the_tail_never_cycles(len in 1usize..30) {
        let (supersedes, tail) = build_chain(len);
        prop_assert!(!would_create_cycle(&supersedes, "fact-new", &tail));
    }

    #[test]
    fn linking_back_to_an_ancestor_always_cycles(len in 2usize..30, offset in 0usize..29) {
        let (supersedes, tail) = build_chain(len);
        let ancestor_idx = offset % len;
        let ancestor = format!("fact-{ancestor_idx}");
        // Every fact in the chain is reachable by walking backward from the
        // tail, so re-pointing the tail's ultimate successor at any
        // ancestor closes a loop.
        prop_assert!(would_create_cycle(&supersedes, &ancestor, &tail));
    }

    #[test]
    fn self_supersede_always_cycles(len in 1usize..30) {
        let (supersedes, tail) = build_chain(len);
        prop_assert!(would_create_cycle(&supersedes, &tail, &tail));
    }
}
