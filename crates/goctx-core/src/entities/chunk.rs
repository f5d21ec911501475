use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ChunkType;

/// A contiguous slice of source used as the unit of embedding and retrieval.
///
/// Natural key: (`file_id`, `start_line`, `end_line`). `content_hash` covers
/// `content` only — never the context fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub id: i64,
    pub file_id: i64,
    /// Owning symbol; `None` for package-level chunks.
    pub symbol_id: Option<i64>,
    pub content: String,
    pub content_hash: String,
    pub token_count: u32,
    pub start_line: u32,
    pub end_line: u32,
    pub context_before: String,
    pub context_after: String,
    pub chunk_type: ChunkType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chunk {
    /// Content with surrounding context, the text handed to the embedder.
    #[must_use]
    pub fn full_content(&self) -> String {
        full_content(&self.content, &self.context_before, &self.context_after)
    }
}

/// Upsert payload for a chunk row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewChunk {
    pub symbol_id: Option<i64>,
    pub content: String,
    pub content_hash: String,
    pub token_count: u32,
    pub start_line: u32,
    pub end_line: u32,
    pub context_before: String,
    pub context_after: String,
    pub chunk_type: ChunkType,
}

impl NewChunk {
    /// Content with surrounding context, the text handed to the embedder.
    #[must_use]
    pub fn full_content(&self) -> String {
        full_content(&self.content, &self.context_before, &self.context_after)
    }
}

fn full_content(content: &str, before: &str, after: &str) -> String {
    let mut out = String::with_capacity(before.len() + content.len() + after.len() + 2);
    if !before.is_empty() {
        out.push_str(before);
        out.push('\n');
    }
    out.push_str(content);
    if !after.is_empty() {
        out.push('\n');
        out.push_str(after);
    }
    out
}
