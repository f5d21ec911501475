//! Store (database file) configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Explicit database file path. Empty means the per-project default
    /// `~/.gocontext/<project_hash>.db`.
    #[serde(default)]
    pub path: String,

    /// How long a writer waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// The configured override path, if any.
    #[must_use]
    pub fn override_path(&self) -> Option<PathBuf> {
        if self.path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_means_no_override() {
        let config = StoreConfig::default();
        assert!(config.override_path().is_none());
        assert_eq!(config.busy_timeout_ms, 5000);
    }

    #[test]
    fn explicit_path_is_returned() {
        let config = StoreConfig {
            path: "/tmp/test.db".to_string(),
            ..Default::default()
        };
        assert_eq!(config.override_path(), Some(PathBuf::from("/tmp/test.db")));
    }
}
