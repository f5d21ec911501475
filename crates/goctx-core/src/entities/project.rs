use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed repository root.
///
/// Created on first index; counts and `last_indexed_at` are refreshed on
/// every reindex completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    /// Absolute repository root. Unique across the store.
    pub root_path: String,
    /// Module path from `go.mod`, empty when none was found.
    pub module_name: String,
    /// Toolchain version from the `go` directive, empty when unknown.
    pub go_version: String,
    pub total_files: i64,
    pub total_chunks: i64,
    pub index_version: i64,
    pub last_indexed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
