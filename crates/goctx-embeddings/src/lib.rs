//! # goctx-embeddings
//!
//! Embedding generation for gocontext.
//!
//! Two backends behind the [`Embedder`] trait:
//! - [`local::LocalEmbedder`] — fastembed ONNX models running in-process,
//!   no API keys required. Models cache under `~/.gocontext/cache/fastembed`.
//! - [`remote::RemoteEmbedder`] — an OpenAI-style HTTP `/embeddings`
//!   endpoint via reqwest.
//!
//! The trait returns boxed futures so callers hold `Arc<dyn Embedder>`
//! without leaking the concrete backend.

pub mod error;
pub mod local;
pub mod provider;
pub mod remote;
pub mod testing;

pub use error::EmbeddingError;
pub use local::LocalEmbedder;
pub use provider::{BoxFuture, Embedder};
pub use remote::RemoteEmbedder;
