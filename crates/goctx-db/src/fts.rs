//! FTS5 query sanitization and BM25 score normalization.

use crate::error::StoreError;

/// Escape a user keyword query against FTS5 operators.
///
/// The operator characters `" * ( )` are stripped and every remaining term
/// is double-quoted, which also neutralizes the boolean keywords
/// (AND/OR/NOT/NEAR) into plain tokens. The result is bound as the MATCH
/// argument, never interpolated.
///
/// # Errors
///
/// Returns [`StoreError::EmptyQuery`] when nothing searchable remains.
pub fn sanitize_query(query: &str) -> Result<String, StoreError> {
    let mut terms = Vec::new();
    for raw in query.split_whitespace() {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, '"' | '*' | '(' | ')'))
            .collect();
        if cleaned.is_empty() {
            continue;
        }
        terms.push(format!("\"{cleaned}\""));
    }
    if terms.is_empty() {
        return Err(StoreError::EmptyQuery);
    }
    Ok(terms.join(" "))
}

/// Normalize a raw FTS5 `bm25()` score to `(0, 1]`, larger is better.
///
/// Raw BM25 is negative and unbounded below; `1 / (1 + |raw|/50)` maps it
/// into the same "larger is better" convention as vector similarity.
#[must_use]
pub fn normalize_bm25(raw: f64) -> f64 {
    1.0 / (1.0 + raw.abs() / 50.0)
}
