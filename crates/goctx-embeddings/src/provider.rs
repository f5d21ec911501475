//! The embedding capability contract.

use std::future::Future;
use std::pin::Pin;

use crate::error::EmbeddingError;

/// Boxed future returned by [`Embedder`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An opaque embedding backend yielding a fixed-dimension vector per text.
///
/// Implementations must be safe for concurrent use; the indexer calls
/// `embed` from several workers at once.
pub trait Embedder: Send + Sync {
    /// Backend identifier stored on embedding rows (`"local"`, `"remote"`).
    fn provider(&self) -> &str;

    /// Model identifier stored on embedding rows.
    fn model(&self) -> &str;

    /// Output vector dimension. Every returned vector has exactly this
    /// length.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input in input order.
    fn embed(&self, texts: Vec<String>) -> BoxFuture<'_, Result<Vec<Vec<f32>>, EmbeddingError>>;
}
