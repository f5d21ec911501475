//! Reciprocal Rank Fusion.
//!
//! `rrf(c) = Σ 1/(k + rank_i(c))` over the lists c appears in, ranks
//! 1-based, absent lists contributing 0. The input lists arrive already
//! sorted best-first from the store lanes.

use goctx_db::ScoredChunk;

/// Fuse two ranked lists. Output is sorted by fused score descending,
/// ties broken by ascending chunk id.
#[must_use]
pub fn fuse(
    vector_results: &[ScoredChunk],
    text_results: &[ScoredChunk],
    rrf_constant: u32,
) -> Vec<ScoredChunk> {
    let k = f64::from(rrf_constant);
    let mut fused: std::collections::HashMap<i64, f64> = std::collections::HashMap::new();

    for (position, hit) in vector_results.iter().enumerate() {
        *fused.entry(hit.chunk_id).or_insert(0.0) += 1.0 / (k + (position as f64 + 1.0));
    }
    for (position, hit) in text_results.iter().enumerate() {
        *fused.entry(hit.chunk_id).or_insert(0.0) += 1.0 / (k + (position as f64 + 1.0));
    }

    let mut results: Vec<ScoredChunk> = fused
        .into_iter()
        .map(|(chunk_id, score)| ScoredChunk { chunk_id, score })
        .collect();
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hit(chunk_id: i64, score: f64) -> ScoredChunk {
        ScoredChunk { chunk_id, score }
    }

    #[test]
    fn fused_score_sums_both_lists() {
        // A: rank 1 vector, rank 2 text. B: rank 2 vector, rank 1 text.
        let vector = vec![hit(1, 0.9), hit(2, 0.8)];
        let text = vec![hit(2, 0.95), hit(1, 0.7)];

        let fused = fuse(&vector, &text, 60);
        let expected = 1.0 / 61.0 + 1.0 / 62.0;
        assert_eq!(fused.len(), 2);
        assert!((fused[0].score - expected).abs() < 1e-12);
        assert!((fused[1].score - expected).abs() < 1e-12);
        // Equal scores: ascending chunk id wins.
        assert_eq!(fused[0].chunk_id, 1);
        assert_eq!(fused[1].chunk_id, 2);
    }

    #[test]
    fn absent_list_contributes_zero() {
        let vector = vec![hit(1, 0.9)];
        let text: Vec<ScoredChunk> = Vec::new();

        let fused = fuse(&vector, &text, 60);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].score - 1.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn chunk_in_both_lists_outranks_single_list_peers() {
        let vector = vec![hit(10, 0.9), hit(20, 0.8)];
        let text = vec![hit(10, 0.9), hit(30, 0.8)];

        let fused = fuse(&vector, &text, 60);
        assert_eq!(fused[0].chunk_id, 10);
        assert!(fused[0].score > fused[1].score);
    }

    #[test]
    fn ranks_are_positional_not_score_weighted() {
        // Scores only order the input; RRF sees positions.
        let vector = vec![hit(1, 0.99), hit(2, 0.98)];
        let text = vec![hit(2, 0.2), hit(1, 0.1)];

        let fused = fuse(&vector, &text, 60);
        let expected = 1.0 / 61.0 + 1.0 / 62.0;
        for result in &fused {
            assert!((result.score - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_inputs_fuse_to_empty() {
        assert!(fuse(&[], &[], 60).is_empty());
    }
}
