//! Indexing error types.

use thiserror::Error;

/// Errors that abort an index run. Per-file failures never raise these;
/// they are recorded in the report instead.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] goctx_db::StoreError),

    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("index cancelled")]
    Cancelled,
}
