//! Local embedding generation using fastembed (ONNX runtime).
//!
//! fastembed is synchronous — the ONNX runtime and Rayon handle parallelism
//! internally — and `embed` takes `&mut self`, so the model sits behind a
//! `std::sync::Mutex` and inference runs on the blocking pool.
//!
//! First use downloads the model (~80–100 MB) to
//! `~/.gocontext/cache/fastembed/`; subsequent runs reuse the cache.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::error::EmbeddingError;
use crate::provider::{BoxFuture, Embedder};

/// Stable model cache directory, out of the repository tree.
fn cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gocontext")
        .join("cache")
        .join("fastembed")
}

/// Resolve a configured model name to a fastembed model and its dimension.
fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize), EmbeddingError> {
    match name {
        "all-minilm-l6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        other => Err(EmbeddingError::UnknownModel(other.to_string())),
    }
}

/// fastembed-backed [`Embedder`].
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl LocalEmbedder {
    /// Load (downloading if necessary) the named model.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::UnknownModel`] for unrecognized names and
    /// [`EmbeddingError::InitFailed`] when the model cannot be loaded.
    pub fn new(model_name: &str) -> Result<Self, EmbeddingError> {
        let (model_id, dimension) = resolve_model(model_name)?;
        let options = TextInitOptions::new(model_id).with_cache_dir(cache_dir());
        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        tracing::info!(model = model_name, dimension, "local embedding model loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name: model_name.to_string(),
            dimension,
        })
    }
}

impl Embedder for LocalEmbedder {
    fn provider(&self) -> &str {
        "local"
    }

    fn model(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: Vec<String>) -> BoxFuture<'_, Result<Vec<Vec<f32>>, EmbeddingError>> {
        let model = Arc::clone(&self.model);
        let expected = texts.len();
        Box::pin(async move {
            if expected == 0 {
                return Ok(Vec::new());
            }
            let vectors = tokio::task::spawn_blocking(move || {
                let mut guard = model
                    .lock()
                    .map_err(|_| EmbeddingError::EmbedFailed("model mutex poisoned".to_string()))?;
                guard
                    .embed(texts, None)
                    .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
            })
            .await
            .map_err(|e| EmbeddingError::EmbedFailed(format!("blocking task failed: {e}")))??;

            if vectors.len() != expected {
                return Err(EmbeddingError::CountMismatch {
                    expected,
                    got: vectors.len(),
                });
            }
            Ok(vectors)
        })
    }
}
