//! Embedding error types.

/// Errors that can occur during embedding generation.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Model initialization failed (download, ONNX runtime, cache issues).
    #[error("model initialization failed: {0}")]
    InitFailed(String),

    /// Embedding generation failed (inference error, HTTP failure).
    #[error("embedding generation failed: {0}")]
    EmbedFailed(String),

    /// Provider returned the wrong number of vectors for the input batch.
    #[error("provider returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    /// The requested model is not known to the backend.
    #[error("unknown embedding model: {0}")]
    UnknownModel(String),
}
