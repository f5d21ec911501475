//! Store error types for goctx-db.

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed.
    #[error("query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// The database was written by a newer binary.
    #[error("database schema version {found} is newer than supported {supported}")]
    SchemaTooNew { found: i64, supported: i64 },

    /// Lookup key absent. Expected, non-fatal for callers.
    #[error("not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    /// Unique constraint hit on a create (upserts never raise this).
    #[error("already exists: {entity} {key}")]
    AlreadyExists { entity: &'static str, key: String },

    /// Keyword query empty after FTS sanitization.
    #[error("keyword query is empty after sanitization")]
    EmptyQuery,

    /// `begin_tx` attempted while a transaction is already open on this
    /// connection.
    #[error("nested transactions are not supported")]
    UnsupportedNesting,

    /// Underlying libSQL error.
    #[error("libsql error: {0}")]
    LibSql(libsql::Error),
}

impl From<libsql::Error> for StoreError {
    fn from(e: libsql::Error) -> Self {
        let msg = e.to_string();
        if msg.contains("within a transaction") {
            Self::UnsupportedNesting
        } else {
            Self::LibSql(e)
        }
    }
}

impl StoreError {
    /// Whether the error is a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::LibSql(e) => e.to_string().contains("UNIQUE constraint failed"),
            Self::AlreadyExists { .. } => true,
            _ => false,
        }
    }
}
