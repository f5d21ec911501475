//! Search error types.

use thiserror::Error;

/// Errors that abort a search and surface as a single error response.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Empty query, non-positive project id, or other unusable input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Keyword query empty after FTS sanitization.
    #[error("keyword query is empty after sanitization")]
    EmptyQuery,

    #[error(transparent)]
    Store(goctx_db::StoreError),

    #[error(transparent)]
    Embedding(#[from] goctx_embeddings::EmbeddingError),

    #[error("search cancelled")]
    Cancelled,
}

impl From<goctx_db::StoreError> for SearchError {
    fn from(e: goctx_db::StoreError) -> Self {
        match e {
            goctx_db::StoreError::EmptyQuery => Self::EmptyQuery,
            other => Self::Store(other),
        }
    }
}
