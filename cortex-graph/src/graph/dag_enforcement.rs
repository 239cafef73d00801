//! Cycle detection for the in-memory reference graph, checked before every
//! edge insertion that must stay acyclic.

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::NodeIndex;

use super::stable_graph::IndexedGraph;

/// Check whether adding an edge from `source` to `target` would create a
/// cycle. Uses a reachability DFS on the graph as it stands before the
/// proposed edge is added.
///
/// Returns `true` if a cycle would be created (edge should be rejected).
pub fn would_create_cycle(graph: &IndexedGraph, source: NodeIndex, target: NodeIndex) -> bool {
    if source == target {
        return true;
    }
    has_path(&graph.graph, target, source)
}

/// DFS-based reachability check: can we reach `to` from `from`?
fn has_path(
    graph: &petgraph::stable_graph::StableGraph<
        super::stable_graph::GraphNode,
        super::stable_graph::GraphEdge,
        petgraph::Directed,
    >,
    from: NodeIndex,
    to: NodeIndex,
) -> bool {
    use petgraph::visit::Dfs;
    let mut dfs = Dfs::new(graph, from);
    while let Some(node) = dfs.next(graph) {
        if node == to {
            return true;
        }
    }
    false
}

/// Validate the entire graph is a DAG. Returns the SCCs with more than one
/// node, i.e. the cycles.
pub fn find_cycles(graph: &IndexedGraph) -> Vec<Vec<NodeIndex>> {
    tarjan_scc(&graph.graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .collect()
}
