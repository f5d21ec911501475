//! Cross-cutting error types for gocontext.
//!
//! Domain-specific errors (e.g. `StoreError`, `ParserError`) are defined in
//! their respective crates. `CoreError` covers the kinds that can originate
//! anywhere in the pipeline.

use thiserror::Error;

/// Errors that can be raised by any gocontext crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    /// Unique constraint violated on create (upserts never raise this).
    #[error("already exists: {entity} {key}")]
    AlreadyExists { entity: &'static str, key: String },

    /// A request carried an argument the pipeline cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Cancellation was observed at a suspension point.
    #[error("operation cancelled")]
    Cancelled,

    /// File system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
