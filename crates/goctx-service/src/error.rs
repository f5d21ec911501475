//! Facade error type: every crate's errors converge here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request is unusable: unknown mode, unknown filter name, wrong
    /// project path.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested project has never been indexed.
    #[error("project not indexed: {0}")]
    ProjectNotIndexed(String),

    #[error(transparent)]
    Config(#[from] goctx_config::ConfigError),

    #[error(transparent)]
    Store(#[from] goctx_db::StoreError),

    #[error(transparent)]
    Embedding(#[from] goctx_embeddings::EmbeddingError),

    #[error(transparent)]
    Index(#[from] goctx_indexer::IndexError),

    #[error(transparent)]
    Search(#[from] goctx_search::SearchError),

    #[error("operation cancelled")]
    Cancelled,
}
