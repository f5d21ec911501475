//! Search engine configuration.

use serde::{Deserialize, Serialize};

/// Result-cache capacity in responses. Zero disables the cache.
const fn default_cache_capacity() -> usize {
    128
}

/// RRF dampening constant.
const fn default_rrf_constant() -> u32 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_rrf_constant")]
    pub rrf_constant: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            rrf_constant: default_rrf_constant(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SearchConfig::default();
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.rrf_constant, 60);
    }
}
