use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CortexResult;

/// A node or relationship surfaced by the graph adapter during recall
/// expansion (spec §4.5).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub properties: Value,
}

/// External native-graph adapter capability set, implemented against
/// Neo4j, Memgraph, or any Cypher-compatible store (spec §6).
///
/// Optional: every caller must degrade gracefully when no adapter is
/// configured, never treating graph failures as fatal to the write or
/// read path they augment.
#[async_trait]
pub trait IGraphAdapter: Send + Sync {
    async fn connect(&self) -> CortexResult<()>;
    async fn disconnect(&self) -> CortexResult<()>;

    async fn upsert_node(&self, label: &str, props: Value) -> CortexResult<String>;
    async fn update_node(&self, id: &str, props: Value) -> CortexResult<()>;
    async fn delete_node(&self, id: &str, cleanup_orphans: bool) -> CortexResult<()>;
    async fn find_nodes(
        &self,
        label: &str,
        filter: Value,
        limit: usize,
    ) -> CortexResult<Vec<GraphNode>>;

    async fn relate(
        &self,
        from: &str,
        rel_type: &str,
        to: &str,
        props: Option<Value>,
    ) -> CortexResult<()>;
    async fn unrelate(&self, from: &str, rel_type: &str, to: &str) -> CortexResult<()>;

    async fn query(&self, cypher_like: &str, params: Value) -> CortexResult<Vec<GraphNode>>;
}
