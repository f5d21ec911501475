//! Store-side search lanes: vector scan and FTS keyword matching.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::StoreError;
use crate::fts::{normalize_bm25, sanitize_query};
use crate::search::{ScoredChunk, SearchFilters};
use crate::vector::{cosine_similarity, decode_vector};

/// A ranked hit; `Ord` is "greater = better": higher score first, then
/// lower chunk id.
#[derive(Debug, PartialEq)]
struct Hit {
    score: f64,
    chunk_id: i64,
}

impl Eq for Hit {}

impl PartialOrd for Hit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.chunk_id.cmp(&self.chunk_id))
    }
}

/// Vector similarity search.
///
/// libsql carries no native vector extension, so this is the streamed
/// fallback lane: fetch candidate `(chunk_id, vector)` rows matching the
/// filters, compute cosine in process, and partial-sort the top `limit` in
/// O(n log limit). Rows whose blob disagrees with the stored dimension are
/// skipped with a warning.
pub async fn search_vector(
    conn: &libsql::Connection,
    project_id: i64,
    query_vec: &[f32],
    limit: usize,
    filters: &SearchFilters,
) -> Result<Vec<ScoredChunk>, StoreError> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut sql = String::from(
        "SELECT c.id, e.vector, e.dimension
         FROM embeddings e
         JOIN chunks c ON c.id = e.chunk_id
         JOIN files f ON f.id = c.file_id
         LEFT JOIN symbols s ON s.id = c.symbol_id
         WHERE f.project_id = ?",
    );
    let mut params: Vec<libsql::Value> = vec![libsql::Value::from(project_id)];
    filters.compile(&mut sql, &mut params);

    let mut rows = conn.query(&sql, params).await?;
    let mut heap: BinaryHeap<Reverse<Hit>> = BinaryHeap::with_capacity(limit + 1);
    while let Some(row) = rows.next().await? {
        let chunk_id = row.get::<i64>(0)?;
        let blob = row.get::<Vec<u8>>(1)?;
        let dimension = usize::try_from(row.get::<i64>(2)?).unwrap_or(0);

        if dimension != query_vec.len() {
            tracing::warn!(chunk_id, dimension, query_dim = query_vec.len(),
                "skipping embedding with mismatched dimension");
            continue;
        }
        let Some(vector) = decode_vector(&blob, dimension) else {
            tracing::warn!(chunk_id, blob_len = blob.len(),
                "skipping embedding with malformed blob");
            continue;
        };

        let score = cosine_similarity(query_vec, &vector);
        heap.push(Reverse(Hit { score, chunk_id }));
        if heap.len() > limit {
            heap.pop();
        }
    }

    let mut hits: Vec<Hit> = heap.into_iter().map(|Reverse(hit)| hit).collect();
    hits.sort_by(|a, b| b.cmp(a));
    Ok(hits
        .into_iter()
        .map(|hit| ScoredChunk {
            chunk_id: hit.chunk_id,
            score: hit.score,
        })
        .collect())
}

/// Keyword search over `chunks_fts`, scored by normalized BM25.
///
/// Results come back sorted by normalized score descending (ties by
/// ascending chunk id), matching the vector lane's convention.
///
/// # Errors
///
/// Returns [`StoreError::EmptyQuery`] when the sanitized query is empty.
pub async fn search_text(
    conn: &libsql::Connection,
    project_id: i64,
    query: &str,
    limit: usize,
    filters: &SearchFilters,
) -> Result<Vec<ScoredChunk>, StoreError> {
    let sanitized = sanitize_query(query)?;
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut sql = String::from(
        "SELECT c.id, bm25(chunks_fts)
         FROM chunks_fts
         JOIN chunks c ON c.id = chunks_fts.chunk_id
         JOIN files f ON f.id = c.file_id
         LEFT JOIN symbols s ON s.id = c.symbol_id
         WHERE chunks_fts MATCH ? AND f.project_id = ?",
    );
    let mut params: Vec<libsql::Value> = vec![
        libsql::Value::from(sanitized),
        libsql::Value::from(project_id),
    ];
    filters.compile(&mut sql, &mut params);
    sql.push_str(" ORDER BY abs(bm25(chunks_fts)) ASC, c.id ASC LIMIT ?");
    params.push(libsql::Value::from(i64::try_from(limit).unwrap_or(i64::MAX)));

    let mut rows = conn.query(&sql, params).await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        let chunk_id = row.get::<i64>(0)?;
        let raw = row.get::<f64>(1)?;
        results.push(ScoredChunk {
            chunk_id,
            score: normalize_bm25(raw),
        });
    }
    Ok(results)
}

/// Keyword search over `symbols_fts` (name, signature, doc comment).
///
/// Exposed for symbol-oriented callers; the chunk search lanes above are
/// the mainline.
pub async fn search_symbols_text(
    conn: &libsql::Connection,
    project_id: i64,
    query: &str,
    limit: usize,
) -> Result<Vec<(i64, f64)>, StoreError> {
    let sanitized = sanitize_query(query)?;
    let mut rows = conn
        .query(
            "SELECT s.id, bm25(symbols_fts)
             FROM symbols_fts
             JOIN symbols s ON s.id = symbols_fts.symbol_id
             JOIN files f ON f.id = s.file_id
             WHERE symbols_fts MATCH ?1 AND f.project_id = ?2
             ORDER BY abs(bm25(symbols_fts)) ASC, s.id ASC LIMIT ?3",
            libsql::params![
                sanitized,
                project_id,
                i64::try_from(limit).unwrap_or(i64::MAX)
            ],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push((row.get::<i64>(0)?, normalize_bm25(row.get::<f64>(1)?)));
    }
    Ok(results)
}
