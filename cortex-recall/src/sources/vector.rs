use cortex_core::errors::CortexResult;
use cortex_core::models::Memory;
use cortex_core::traits::IMemoryStorage;

/// Vector k-NN source: nearest memories by embedding cosine similarity
/// (spec §4.5).
pub async fn search_vector(
    storage: &(impl IMemoryStorage + ?Sized),
    memory_space_id: &str,
    embedding: &[f32],
    limit: usize,
) -> CortexResult<Vec<(Memory, f64)>> {
    storage.search_memory_vector(memory_space_id, embedding, limit).await
}
