use async_trait::async_trait;

use crate::errors::CortexResult;

/// Embedding generation provider (spec §6).
#[async_trait]
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    async fn embed(&self, text: &str) -> CortexResult<Vec<f32>>;

    /// Embed a batch of texts in one round trip where the provider
    /// supports it.
    async fn embed_batch(&self, texts: &[String]) -> CortexResult<Vec<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name, used in error messages and tracing.
    fn name(&self) -> &str;
}
