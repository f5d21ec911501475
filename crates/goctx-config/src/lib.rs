//! # goctx-config
//!
//! Layered configuration loading for gocontext using figment.
//!
//! Configuration sources (in priority order):
//! 1. Environment variables (`GOCTX_*`, `__`-separated nesting)
//! 2. Project-level `.gocontext.toml` in the indexed repository root
//! 3. User-level `~/.config/gocontext/config.toml`
//! 4. Built-in defaults

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

pub mod embedding;
pub mod error;
pub mod general;
pub mod indexing;
pub mod search;
pub mod store;

pub use embedding::{EmbeddingConfig, EmbeddingProviderKind};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use indexing::IndexingConfig;
pub use search::SearchConfig;
pub use store::StoreConfig;

/// Full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration for a project rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a layer fails to parse or merge.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs::config_dir() {
            let user_file = config_dir.join("gocontext").join("config.toml");
            figment = figment.merge(Toml::file(user_file));
        }
        figment = figment
            .merge(Toml::file(project_root.join(".gocontext.toml")))
            .merge(Env::prefixed("GOCTX_").split("__"));

        Ok(figment.extract()?)
    }
}
