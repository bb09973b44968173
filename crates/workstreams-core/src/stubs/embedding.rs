//! Stub implementation of [`EmbeddingProvider`].
//!
//! # ⚠️ TEST ONLY - DO NOT USE IN PRODUCTION ⚠️
//!
//! Produces deterministic pseudo-random unit vectors from a hash of the
//! input text. Identical texts always embed identically; distinct texts
//! land in effectively random directions, so stub embeddings carry no
//! semantic signal. Tests that need geometric structure build their
//! vectors by hand instead of going through this provider.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::error::WorkstreamResult;
use crate::traits::EmbeddingProvider;

/// Default dimensionality, matching a small sentence-transformer model.
pub const STUB_EMBEDDING_DIMENSIONS: usize = 384;

/// Hash-based deterministic embedding provider.
///
/// # ⚠️ TEST ONLY ⚠️
///
/// No model behind it; vectors are seeded from the text hash and
/// L2-normalized.
#[derive(Debug, Clone)]
pub struct StubEmbeddingProvider {
    dims: usize,
}

impl StubEmbeddingProvider {
    /// Create a provider emitting vectors of the given dimensionality.
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl Default for StubEmbeddingProvider {
    fn default() -> Self {
        Self::new(STUB_EMBEDDING_DIMENSIONS)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    async fn embed(&self, text: &str) -> WorkstreamResult<Vec<f32>> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish() | 1;

        let mut vector = Vec::with_capacity(self.dims);
        for _ in 0..self.dims {
            // Linear congruential step; the high bits become a value in [-1, 1).
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 33) as f32 / (1u64 << 31) as f32;
            vector.push(unit * 2.0 - 1.0);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}
