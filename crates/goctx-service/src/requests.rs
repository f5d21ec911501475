//! Wire request shapes for the three service operations.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

const fn default_limit() -> i64 {
    10
}

fn default_mode() -> String {
    "hybrid".to_string()
}

/// Request for `index_codebase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexCodebaseRequest {
    pub path: String,
    #[serde(default)]
    pub force_reindex: bool,
    #[serde(default = "default_true")]
    pub include_tests: bool,
    #[serde(default)]
    pub include_vendor: bool,
}

/// Structured filters for `search_code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFiltersRequest {
    /// Symbol kind names (`"function"`, `"method"`, ...).
    #[serde(default)]
    pub symbol_types: Vec<String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_pattern: Option<String>,
    /// DDD role names (`"repository"`, `"aggregate_root"`, ...).
    #[serde(default)]
    pub ddd_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_relevance: Option<f64>,
}

/// Request for `search_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCodeRequest {
    pub path: String,
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_mode")]
    pub search_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFiltersRequest>,
}

/// Request for `get_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_request_defaults() {
        let request: IndexCodebaseRequest =
            serde_json::from_str(r#"{"path": "/repo"}"#).unwrap();
        assert!(!request.force_reindex);
        assert!(request.include_tests);
        assert!(!request.include_vendor);
    }

    #[test]
    fn search_request_defaults() {
        let request: SearchCodeRequest =
            serde_json::from_str(r#"{"path": "/repo", "query": "spawn"}"#).unwrap();
        assert_eq!(request.limit, 10);
        assert_eq!(request.search_mode, "hybrid");
        assert!(request.filters.is_none());
    }

    #[test]
    fn search_filters_parse() {
        let request: SearchCodeRequest = serde_json::from_str(
            r#"{
                "path": "/repo",
                "query": "orders",
                "search_mode": "keyword",
                "filters": {
                    "symbol_types": ["function", "method"],
                    "ddd_patterns": ["repository"],
                    "file_pattern": "internal/*",
                    "min_relevance": 0.2
                }
            }"#,
        )
        .unwrap();
        let filters = request.filters.unwrap();
        assert_eq!(filters.symbol_types.len(), 2);
        assert_eq!(filters.ddd_patterns, vec!["repository"]);
        assert_eq!(filters.min_relevance, Some(0.2));
    }
}
