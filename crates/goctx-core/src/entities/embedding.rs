use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored vector for one chunk. Natural key: (`chunk_id`).
///
/// Vectors persist as packed little-endian `f32` blobs of length
/// `dimension × 4` bytes. Embeddings may be recomputed without recreating
/// the chunk when only the model changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    pub id: i64,
    pub chunk_id: i64,
    pub vector: Vec<f32>,
    pub dimension: u32,
    pub provider: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

/// Upsert payload for an embedding row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEmbedding {
    pub vector: Vec<f32>,
    pub provider: String,
    pub model: String,
}
