//! Reference-graph helpers over the storage primitives (component C3,
//! spec §4.3): bidirectional linking between memories, conversations,
//! facts, and immutable/mutable snapshots, the context tree, and the
//! cycle detection shared with belief revision's supersede-chain
//! invariant (spec §4.4, §8 item 2).

pub mod graph;
pub mod resolve;
pub mod supersede;
pub mod traversal;

pub use graph::{GraphEdge, GraphNode, IndexedGraph, LinkKind, NodeKind};
