//! petgraph::StableGraph wrapper over the reference-graph's node and edge
//! shapes (spec §4.3): memory, conversation, fact, immutable/mutable
//! snapshot, and context nodes, linked by the handful of concrete edge
//! kinds the reference graph defines.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;
use serde::{Deserialize, Serialize};

/// The entity a graph node stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Memory,
    Conversation,
    Fact,
    Immutable,
    Mutable,
    Context,
}

/// A node in the reference graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub kind: NodeKind,
    pub entity_id: String,
}

/// The concrete link shapes spec §4.3 names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    MemoryConversation,
    MemoryFact,
    MemoryImmutable,
    MemoryMutable,
    ContextParent,
}

/// Weight on a reference-graph edge. Unlike the causal graph this edge
/// carries no strength or inference evidence: references are written once
/// and never scored or pruned (spec §4.3 policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub kind: LinkKind,
}

pub type ReferenceStableGraph = StableGraph<GraphNode, GraphEdge, Directed>;

/// Wrapper providing indexed access to the reference graph, keyed by
/// `(kind, entity_id)` so memories, facts, and conversations can share one
/// graph without id collisions.
pub struct IndexedGraph {
    pub graph: ReferenceStableGraph,
    node_index: HashMap<(NodeKind, String), NodeIndex>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Get or create a node for the given entity.
    pub fn ensure_node(&mut self, kind: NodeKind, entity_id: &str) -> NodeIndex {
        let key = (kind, entity_id.to_string());
        if let Some(&idx) = self.node_index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            kind,
            entity_id: entity_id.to_string(),
        });
        self.node_index.insert(key, idx);
        idx
    }

    /// Look up a node index by kind and entity id.
    pub fn get_node(&self, kind: NodeKind, entity_id: &str) -> Option<NodeIndex> {
        self.node_index.get(&(kind, entity_id.to_string())).copied()
    }

    /// Add a directed edge, creating endpoints if needed.
    pub fn add_link(
        &mut self,
        from: (NodeKind, &str),
        to: (NodeKind, &str),
        kind: LinkKind,
    ) -> petgraph::stable_graph::EdgeIndex {
        let from_idx = self.ensure_node(from.0, from.1);
        let to_idx = self.ensure_node(to.0, to.1);
        self.graph.add_edge(from_idx, to_idx, GraphEdge { kind })
    }

    pub fn remove_node(&mut self, kind: NodeKind, entity_id: &str) {
        if let Some(idx) = self.node_index.remove(&(kind, entity_id.to_string())) {
            self.graph.remove_node(idx);
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for IndexedGraph {
    fn default() -> Self {
        Self::new()
    }
}
