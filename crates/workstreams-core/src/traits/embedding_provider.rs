//! EmbeddingProvider trait: text to dense vectors.
//!
//! Clustering itself never embeds; it consumes vectors that ingestion
//! attached earlier. The trait lives here so ingestion pipelines, tests,
//! and the stubs all agree on one contract, and so every vector in a
//! corpus is guaranteed to come from a single provider with a single
//! dimensionality.

use async_trait::async_trait;

use crate::error::WorkstreamResult;

/// Produces embedding vectors for achievement text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text into a dense vector of [`dimensions`](Self::dimensions) length.
    ///
    /// # Errors
    /// - `WorkstreamError::Embedding` - Provider unavailable or the text
    ///   could not be embedded
    async fn embed(&self, text: &str) -> WorkstreamResult<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    ///
    /// The default loops over [`embed`](Self::embed); providers with a
    /// batch endpoint should override.
    async fn embed_batch(&self, texts: &[String]) -> WorkstreamResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Dimensionality of every vector this provider emits.
    fn dimensions(&self) -> usize;
}
