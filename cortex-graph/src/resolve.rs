//! Build a reference graph from the storage primitives (spec §4.3): one
//! memory's forward links (conversation, fact, immutable) become edges
//! into an in-memory [`IndexedGraph`] so traversal can answer "what else
//! references this" queries the storage layer has no dedicated index for.

use std::sync::Arc;

use cortex_core::errors::CortexResult;
use cortex_core::traits::IStorageBackend;

use crate::graph::stable_graph::{IndexedGraph, LinkKind, NodeKind};

/// Load every memory in `memory_space_id` and wire up its forward links.
/// Mutable-record links are not added as graph edges: `Memory.mutable_ref`
/// carries a point-in-time value snapshot rather than a live pointer, so
/// there is nothing in the mutable-records collection left to traverse to.
pub async fn build_space_graph(
    backend: &Arc<dyn IStorageBackend>,
    memory_space_id: &str,
) -> CortexResult<IndexedGraph> {
    let mut graph = IndexedGraph::new();
    let memories = backend.list_memories_by_space(memory_space_id).await?;

    for memory in &memories {
        graph.ensure_node(NodeKind::Memory, &memory.memory_id);

        if let Some(ref conv_ref) = memory.conversation_ref {
            graph.add_link(
                (NodeKind::Memory, &memory.memory_id),
                (NodeKind::Conversation, &conv_ref.conversation_id),
                LinkKind::MemoryConversation,
            );
        }
        if let Some(ref facts_ref) = memory.facts_ref {
            graph.add_link(
                (NodeKind::Memory, &memory.memory_id),
                (NodeKind::Fact, &facts_ref.fact_id),
                LinkKind::MemoryFact,
            );
        }
        if let Some(ref immutable_ref) = memory.immutable_ref {
            let key = format!("{}:{}", immutable_ref.record_type, immutable_ref.id);
            graph.add_link(
                (NodeKind::Memory, &memory.memory_id),
                (NodeKind::Immutable, &key),
                LinkKind::MemoryImmutable,
            );
        }
        if memory.mutable_ref.is_some() {
            graph.ensure_node(NodeKind::Mutable, &memory.memory_id);
            graph.add_link(
                (NodeKind::Memory, &memory.memory_id),
                (NodeKind::Mutable, &memory.memory_id),
                LinkKind::MemoryMutable,
            );
        }
    }

    Ok(graph)
}

/// Walk a context's ancestor chain up to its root, following `parent_id`
/// (spec §4.3: `parentId`/`rootId` form a tree).
pub async fn context_ancestors(
    backend: &Arc<dyn IStorageBackend>,
    context_id: &str,
) -> CortexResult<Vec<cortex_core::models::Context>> {
    let mut ancestors = Vec::new();
    let mut current = backend.get_context(context_id).await?;
    while let Some(context) = current {
        let parent_id = context.parent_id.clone();
        ancestors.push(context);
        current = match parent_id {
            Some(ref id) => backend.get_context(id).await?,
            None => None,
        };
    }
    Ok(ancestors)
}

/// Fetch a context's direct children, the denormalized inverse of
/// `parent_id` (spec §4.3: "`childIds` is a denormalized inverse
/// maintained atomically on create/delete").
pub async fn context_children(
    backend: &Arc<dyn IStorageBackend>,
    context_id: &str,
) -> CortexResult<Vec<cortex_core::models::Context>> {
    backend.list_children(context_id).await
}
