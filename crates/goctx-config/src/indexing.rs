//! Indexing pipeline configuration.

use serde::{Deserialize, Serialize};

/// Upper bound on parse/chunk/embed workers. The effective pool is
/// `min(max_workers, available CPUs)`.
const fn default_max_workers() -> usize {
    8
}

/// Chunks above this token count are reported but not split.
const fn default_chunk_token_cap() -> u32 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default = "default_chunk_token_cap")]
    pub chunk_token_cap: u32,

    /// `"function_level"` (default) or `"package_level"`.
    #[serde(default)]
    pub strategy: String,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            chunk_token_cap: default_chunk_token_cap(),
            strategy: String::new(),
        }
    }
}
