//! Remote embedding generation over an OpenAI-style `/embeddings` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;
use crate::provider::{BoxFuture, Embedder};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// HTTP-backed [`Embedder`].
pub struct RemoteEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model_name: String,
    dimension: usize,
}

impl RemoteEmbedder {
    /// Build a client for `endpoint`. `api_key` is sent as a bearer token
    /// when present; it is read from the environment by the caller and never
    /// logged.
    #[must_use]
    pub fn new(endpoint: &str, model_name: &str, api_key: Option<String>, dimension: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key,
            model_name: model_name.to_string(),
            dimension,
        }
    }
}

impl Embedder for RemoteEmbedder {
    fn provider(&self) -> &str {
        "remote"
    }

    fn model(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: Vec<String>) -> BoxFuture<'_, Result<Vec<Vec<f32>>, EmbeddingError>> {
        Box::pin(async move {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let expected = texts.len();

            let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
                model: &self.model_name,
                input: &texts,
            });
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(EmbeddingError::EmbedFailed(format!(
                    "endpoint returned {status}"
                )));
            }

            let body: EmbeddingResponse = response
                .json()
                .await
                .map_err(|e| EmbeddingError::EmbedFailed(format!("invalid response body: {e}")))?;

            if body.data.len() != expected {
                return Err(EmbeddingError::CountMismatch {
                    expected,
                    got: body.data.len(),
                });
            }

            // The endpoint may reorder entries; `index` is authoritative.
            let mut vectors = vec![Vec::new(); expected];
            for datum in body.data {
                if datum.index >= expected {
                    return Err(EmbeddingError::EmbedFailed(format!(
                        "response index {} out of range",
                        datum.index
                    )));
                }
                vectors[datum.index] = datum.embedding;
            }
            Ok(vectors)
        })
    }
}
