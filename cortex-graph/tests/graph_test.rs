//! Reference graph construction, neighbor lookup, and cycle detection
//! (spec §4.3 link shapes, §8 item 2 acyclicity).

use cortex_graph::graph::dag_enforcement;
use cortex_graph::{IndexedGraph, LinkKind, NodeKind};

#[test]
fn add_link_wires_both_endpoints() {
    let mut graph = IndexedGraph::new();
    graph.add_link(
        (NodeKind::Memory, "mem-1"),
        (NodeKind::Conversation, "conv-1"),
        LinkKind::MemoryConversation,
    );

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.get_node(NodeKind::Memory, "mem-1").is_some());
    assert!(graph.get_node(NodeKind::Conversation, "conv-1").is_some());
}

#[test]
fn neighbors_are_bidirectional() {
    let mut graph = IndexedGraph::new();
    graph.add_link(
        (NodeKind::Memory, "mem-1"),
        (NodeKind::Fact, "fact-1"),
        LinkKind::MemoryFact,
    );

    let from_memory = cortex_graph::traversal::neighbors::get(&graph, NodeKind::Memory, "mem-1");
    assert_eq!(from_memory.len(), 1);
    assert_eq!(from_memory[0].entity_id, "fact-1");

    let from_fact = cortex_graph::traversal::neighbors::get(&graph, NodeKind::Fact, "fact-1");
    assert_eq!(from_fact.len(), 1);
    assert_eq!(from_fact[0].entity_id, "mem-1");
}

#[test]
fn neighbors_of_unknown_node_is_empty() {
    let graph = IndexedGraph::new();
    assert!(cortex_graph::traversal::neighbors::get(&graph, NodeKind::Memory, "nope").is_empty());
}

#[test]
fn would_create_cycle_detects_reachable_target() {
    let mut graph = IndexedGraph::new();
    let a = graph.ensure_node(NodeKind::Context, "a");
    let b = graph.ensure_node(NodeKind::Context, "b");
    let c = graph.ensure_node(NodeKind::Context, "c");
    graph.add_link(
        (NodeKind::Context, "a"),
        (NodeKind::Context, "b"),
        LinkKind::ContextParent,
    );
    graph.add_link(
        (NodeKind::Context, "b"),
        (NodeKind::Context, "c"),
        LinkKind::ContextParent,
    );

    // a -> b -> c already exists; c -> a would close the loop.
    assert!(dag_enforcement::would_create_cycle(&graph, c, a));
    // a -> c does not: c has no path back to a yet.
    assert!(!dag_enforcement::would_create_cycle(&graph, a, c));
}

#[test]
fn would_create_cycle_rejects_self_loop() {
    let mut graph = IndexedGraph::new();
    let a = graph.ensure_node(NodeKind::Memory, "a");
    assert!(dag_enforcement::would_create_cycle(&graph, a, a));
}

#[test]
fn find_cycles_is_empty_for_a_dag() {
    let mut graph = IndexedGraph::new();
    graph.add_link(
        (NodeKind::Context, "root"),
        (NodeKind::Context, "child"),
        LinkKind::ContextParent,
    );
    assert!(dag_enforcement::find_cycles(&graph).is_empty());
}
