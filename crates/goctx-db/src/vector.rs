//! Vector blob codec and cosine similarity.
//!
//! Blob format: packed little-endian `f32`, length `dimension × 4` bytes.
//! Rows whose blob length is not a multiple of 4 or disagrees with the
//! stored dimension are skipped by callers with a warning.

/// Encode a vector as a packed little-endian `f32` blob.
#[must_use]
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

/// Decode a packed little-endian `f32` blob.
///
/// Returns `None` when the blob length is not an exact multiple of 4 or
/// does not match `dimension`.
#[must_use]
pub fn decode_vector(blob: &[u8], dimension: usize) -> Option<Vec<f32>> {
    if blob.len() % 4 != 0 || blob.len() / 4 != dimension {
        return None;
    }
    let mut vector = Vec::with_capacity(dimension);
    for bytes in blob.chunks_exact(4) {
        vector.push(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
    }
    Some(vector)
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 when either vector has zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip() {
        let vector = vec![0.1_f32, -2.5, 3.75, 0.0];
        let blob = encode_vector(&vector);
        assert_eq!(blob.len(), 16);
        assert_eq!(decode_vector(&blob, 4).unwrap(), vector);
    }

    #[test]
    fn blob_is_little_endian() {
        let blob = encode_vector(&[1.0]);
        assert_eq!(blob, 1.0_f32.to_le_bytes().to_vec());
    }

    #[test]
    fn mismatched_blob_is_rejected() {
        let blob = encode_vector(&[1.0, 2.0]);
        assert!(decode_vector(&blob, 3).is_none());
        assert!(decode_vector(&blob[..7], 2).is_none());
    }

    #[test]
    fn cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
