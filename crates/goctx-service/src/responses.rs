//! Wire response shapes for the three service operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use goctx_indexer::indexer::FileFailure;

/// Response for `index_codebase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexCodebaseResponse {
    /// `"success"`, `"partial"` (some files failed), or `"error"`.
    pub status: String,
    pub files_indexed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub chunks_created: u64,
    pub embeddings_generated: u64,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileFailure>,
}

/// File coordinates of one search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultFile {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub package: String,
}

/// Symbol metadata of one search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultSymbol {
    pub name: String,
    pub kind: String,
    pub package: String,
    pub signature: String,
}

/// Surrounding context of one search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultContext {
    pub before: String,
    pub after: String,
}

/// One ranked hit in a `search_code` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCodeResult {
    pub rank: u32,
    pub relevance_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<ResultSymbol>,
    pub file: ResultFile,
    pub content: String,
    pub context: ResultContext,
}

/// Response for `search_code`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCodeResponse {
    pub results: Vec<SearchCodeResult>,
    pub total_results: usize,
    pub search_duration_ms: u64,
    pub cache_hit: bool,
}

/// Project summary inside a status response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusProject {
    pub root_path: String,
    pub module_name: String,
    pub total_files: i64,
    pub total_chunks: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_indexed_at: Option<DateTime<Utc>>,
}

/// Row counts inside a status response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub files: i64,
    pub symbols: i64,
    pub chunks: i64,
    pub embeddings: i64,
}

/// Health probes inside a status response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusHealth {
    pub database_accessible: bool,
    /// Whether stored vectors exist, i.e. vector search is usable.
    pub embeddings_available: bool,
    pub fts_indexes_built: bool,
}

/// Response for `get_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub indexed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<StatusProject>,
    pub counts: StatusCounts,
    pub index_size_mb: f64,
    pub health: StatusHealth,
}
