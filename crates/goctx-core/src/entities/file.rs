use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One source file within a project. Natural key: (`project_id`, `file_path`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    pub id: i64,
    pub project_id: i64,
    /// Path relative to the project root, forward slashes.
    pub file_path: String,
    pub package_name: String,
    /// SHA-256 of the file bytes, lowercase hex.
    pub content_hash: String,
    pub mod_time: DateTime<Utc>,
    pub size_bytes: i64,
    /// Captured parser error summary, if the file failed to parse cleanly.
    pub parse_error: Option<String>,
    pub last_indexed_at: Option<DateTime<Utc>>,
}

/// Upsert payload for a file row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub project_id: i64,
    pub file_path: String,
    pub package_name: String,
    pub content_hash: String,
    pub mod_time: DateTime<Utc>,
    pub size_bytes: i64,
    pub parse_error: Option<String>,
}
