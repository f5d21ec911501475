//! Search request/response types.

use serde::{Deserialize, Serialize};

use goctx_core::enums::SearchMode;
use goctx_db::{SearchFilters, SymbolSummary};

/// Hard cap on the effective result limit.
pub const MAX_LIMIT: i64 = 100;

/// Default result limit.
pub const DEFAULT_LIMIT: i64 = 10;

/// Default RRF dampening constant.
pub const DEFAULT_RRF_CONSTANT: u32 = 60;

/// A validated-on-dispatch search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub project_id: i64,
    pub query: String,
    /// Clamped to `[1, MAX_LIMIT]` at dispatch.
    pub limit: i64,
    pub mode: SearchMode,
    pub filters: SearchFilters,
    /// Results scoring below this are dropped from the response.
    pub min_relevance: Option<f64>,
    pub use_cache: bool,
    pub rrf_constant: u32,
}

impl SearchRequest {
    /// A request with the standard defaults: limit 10, hybrid mode,
    /// cache on, RRF constant 60.
    #[must_use]
    pub fn new(project_id: i64, query: impl Into<String>) -> Self {
        Self {
            project_id,
            query: query.into(),
            limit: DEFAULT_LIMIT,
            mode: SearchMode::default(),
            filters: SearchFilters::default(),
            min_relevance: None,
            use_cache: true,
            rrf_constant: DEFAULT_RRF_CONSTANT,
        }
    }

    /// The clamped result limit.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        usize::try_from(self.limit.clamp(1, MAX_LIMIT)).unwrap_or(1)
    }

    /// The RRF constant, with 0 falling back to the default.
    #[must_use]
    pub const fn effective_rrf_constant(&self) -> u32 {
        if self.rrf_constant == 0 {
            DEFAULT_RRF_CONSTANT
        } else {
            self.rrf_constant
        }
    }
}

/// One ranked search hit with hydrated metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// 1-based position in the response.
    pub rank: u32,
    pub relevance_score: f64,
    pub chunk_id: i64,
    pub file_path: String,
    pub file_package: String,
    pub start_line: u32,
    pub end_line: u32,
    pub content: String,
    pub context_before: String,
    pub context_after: String,
    pub symbol: Option<SymbolSummary>,
}

/// The full response for one search request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    /// Hits the vector lane returned before fusion.
    pub vector_hits: usize,
    /// Hits the keyword lane returned before fusion.
    pub text_hits: usize,
    pub search_duration_ms: u64,
    pub cache_hit: bool,
}
