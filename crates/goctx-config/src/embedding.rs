//! Embedding provider configuration.

use serde::{Deserialize, Serialize};

/// Which embedding backend to construct at service start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// fastembed ONNX model running in-process.
    #[default]
    Local,
    /// OpenAI-style HTTP `/embeddings` endpoint.
    Remote,
}

fn default_model() -> String {
    "all-minilm-l6-v2".to_string()
}

fn default_api_key_env() -> String {
    "GOCTX_EMBEDDING_API_KEY".to_string()
}

/// Default number of texts per embedding batch call.
const fn default_batch_size() -> usize {
    32
}

/// Default vector dimension for the remote provider (local models carry
/// their own).
const fn default_dimension() -> usize {
    384
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    /// Model name. For `local` this selects the fastembed model; for
    /// `remote` it is sent verbatim in the request body.
    #[serde(default = "default_model")]
    pub model: String,

    /// Remote endpoint URL (`remote` provider only).
    #[serde(default)]
    pub endpoint: String,

    /// Name of the environment variable holding the remote API key.
    /// The key itself never appears in configuration files.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Number of texts per embedding batch call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Vector dimension the remote endpoint returns. Ignored for `local`.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Local,
            model: default_model(),
            endpoint: String::new(),
            api_key_env: default_api_key_env(),
            batch_size: default_batch_size(),
            dimension: default_dimension(),
        }
    }
}

impl EmbeddingConfig {
    /// Whether the remote provider has the fields it needs.
    #[must_use]
    pub fn remote_is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.provider, EmbeddingProviderKind::Local);
        assert_eq!(config.batch_size, 32);
        assert!(!config.remote_is_configured());
    }
}
