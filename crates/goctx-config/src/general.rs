//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit for search requests.
const fn default_limit() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Log level for the tracing subscriber (`error`..`trace`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default result limit for search requests.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_limit: default_limit(),
        }
    }
}
