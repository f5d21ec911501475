//! Content hashing and token estimation.
//!
//! Chunk identity is a SHA-256 digest of the chunk `content` only — context
//! never feeds the hash, so repopulating context later cannot invalidate
//! stored chunks.

use sha2::{Digest, Sha256};

/// SHA-256 of `content`, as 64 lowercase hex characters.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// SHA-256 of raw file bytes, as 64 lowercase hex characters.
#[must_use]
pub fn bytes_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Rough token estimate for a single text: `ceil(chars / 4)`.
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    u32::try_from(text.len().div_ceil(4)).unwrap_or(u32::MAX)
}

/// Token count stored on a chunk row:
/// `(|content| + |context_before| + |context_after|) / 4`, floored.
#[must_use]
pub fn chunk_token_count(content: &str, context_before: &str, context_after: &str) -> u32 {
    let total = content.len() + context_before.len() + context_after.len();
    u32::try_from(total / 4).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hash_is_deterministic() {
        let a = content_hash("func Greet() {}");
        let b = content_hash("func Greet() {}");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_content() {
        assert_ne!(content_hash("a"), content_hash("b"));
        assert_ne!(content_hash(""), content_hash(" "));
    }

    #[test]
    fn bytes_and_str_hash_agree() {
        assert_eq!(content_hash("package main"), bytes_hash(b"package main"));
    }

    #[test]
    fn estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn chunk_token_count_floors_the_sum() {
        // 5 + 4 + 2 = 11 chars -> 2 tokens
        assert_eq!(chunk_token_count("abcde", "abcd", "ab"), 2);
        assert_eq!(chunk_token_count("", "", ""), 0);
    }
}
