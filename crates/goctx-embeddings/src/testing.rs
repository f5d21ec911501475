//! Deterministic in-memory embedder for tests across the workspace.
//!
//! Produces a pseudo-vector derived from the text bytes, so equal texts get
//! equal vectors and different texts (almost always) diverge — enough for
//! exercising the index/search pipeline without model downloads.

use crate::error::EmbeddingError;
use crate::provider::{BoxFuture, Embedder};

/// Deterministic byte-fold embedder.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut acc = vec![0.0_f32; self.dimension];
        for (i, byte) in text.bytes().enumerate() {
            acc[i % self.dimension] += f32::from(byte) / 255.0;
        }
        // L2-normalize so cosine similarity behaves like real embeddings.
        let norm: f32 = acc.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut acc {
                *x /= norm;
            }
        }
        acc
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Embedder for HashEmbedder {
    fn provider(&self) -> &str {
        "test"
    }

    fn model(&self) -> &str {
        "hash-fold"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: Vec<String>) -> BoxFuture<'_, Result<Vec<Vec<f32>>, EmbeddingError>> {
        let vectors: Vec<Vec<f32>> = texts.iter().map(|t| self.vector_for(t)).collect();
        Box::pin(async move { Ok(vectors) })
    }
}
