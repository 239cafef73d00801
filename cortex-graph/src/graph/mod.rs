//! The in-memory reference-graph type and its cycle-detection utilities.

pub mod dag_enforcement;
pub mod stable_graph;

pub use stable_graph::{GraphEdge, GraphNode, IndexedGraph, LinkKind, NodeKind};
