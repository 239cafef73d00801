//! Direct neighbors (depth=1) of a node, both incoming and outgoing.
//! Reference-graph edges carry no strength or inference evidence (unlike
//! the causal graph this crate started from), so there is nothing to
//! threshold or rank here: every committed link is returned.

use petgraph::Direction;

use crate::graph::stable_graph::{GraphNode, IndexedGraph, NodeKind};

/// All nodes directly linked to `(kind, entity_id)`, in either direction.
pub fn get(graph: &IndexedGraph, kind: NodeKind, entity_id: &str) -> Vec<GraphNode> {
    let idx = match graph.get_node(kind, entity_id) {
        Some(idx) => idx,
        None => return Vec::new(),
    };

    graph
        .graph
        .neighbors_directed(idx, Direction::Outgoing)
        .chain(graph.graph.neighbors_directed(idx, Direction::Incoming))
        .filter_map(|n| graph.graph.node_weight(n).cloned())
        .collect()
}
