use cortex_core::errors::CortexResult;
use cortex_core::traits::{GraphNode, IGraphAdapter};

/// Optional native-graph expansion (spec §4.5, §6): finds nodes related to
/// the query text. Callers must treat this source as purely additive —
/// every caller here already degrades gracefully when no adapter is
/// configured by not calling this at all.
pub async fn search_graph(
    adapter: &(impl IGraphAdapter + ?Sized),
    query_text: &str,
    limit: usize,
) -> CortexResult<Vec<GraphNode>> {
    adapter
        .find_nodes("Entity", serde_json::json!({ "query": query_text }), limit)
        .await
}
