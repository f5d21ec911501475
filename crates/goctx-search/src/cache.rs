//! Bounded LRU response cache.
//!
//! Strictly optional: capacity 0 disables it and disabling never changes
//! results, only latency. The key covers everything that can change a
//! response.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use goctx_core::enums::SearchMode;
use goctx_db::SearchFilters;
use lru::LruCache;

use crate::types::{SearchRequest, SearchResponse};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    project_id: i64,
    mode: SearchMode,
    query: String,
    filters: SearchFilters,
    limit: usize,
    rrf_constant: u32,
    /// `f64::to_bits` of the threshold; `None` when unset.
    min_relevance_bits: Option<u64>,
}

impl CacheKey {
    fn of(request: &SearchRequest) -> Self {
        Self {
            project_id: request.project_id,
            mode: request.mode,
            query: request.query.clone(),
            filters: request.filters.clone(),
            limit: request.effective_limit(),
            rrf_constant: request.effective_rrf_constant(),
            min_relevance_bits: request.min_relevance.map(f64::to_bits),
        }
    }
}

/// LRU cache of full search responses, guarded by a single mutex.
pub struct SearchCache {
    inner: Mutex<LruCache<CacheKey, SearchResponse>>,
}

impl SearchCache {
    /// Returns `None` for capacity 0 (cache disabled).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            inner: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Cached response for this request, marked as a cache hit.
    pub fn get(&self, request: &SearchRequest) -> Option<SearchResponse> {
        let key = CacheKey::of(request);
        let mut guard = self.inner.lock().ok()?;
        guard.get(&key).map(|cached| {
            let mut response = cached.clone();
            response.cache_hit = true;
            response
        })
    }

    /// Store a freshly computed response.
    pub fn insert(&self, request: &SearchRequest, response: &SearchResponse) {
        let key = CacheKey::of(request);
        if let Ok(mut guard) = self.inner.lock() {
            guard.put(key, response.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(total: usize) -> SearchResponse {
        SearchResponse {
            results: Vec::new(),
            total_results: total,
            vector_hits: 0,
            text_hits: 0,
            search_duration_ms: 5,
            cache_hit: false,
        }
    }

    #[test]
    fn zero_capacity_disables() {
        assert!(SearchCache::with_capacity(0).is_none());
    }

    #[test]
    fn hit_is_marked() {
        let cache = SearchCache::with_capacity(4).unwrap();
        let request = SearchRequest::new(1, "spawn");
        assert!(cache.get(&request).is_none());

        cache.insert(&request, &response(3));
        let hit = cache.get(&request).unwrap();
        assert!(hit.cache_hit);
        assert_eq!(hit.total_results, 3);
    }

    #[test]
    fn key_distinguishes_requests() {
        let cache = SearchCache::with_capacity(4).unwrap();
        let request = SearchRequest::new(1, "spawn");
        cache.insert(&request, &response(3));

        let mut other_mode = request.clone();
        other_mode.mode = goctx_core::enums::SearchMode::Keyword;
        assert!(cache.get(&other_mode).is_none());

        let mut other_limit = request.clone();
        other_limit.limit = 50;
        assert!(cache.get(&other_limit).is_none());

        let mut other_threshold = request.clone();
        other_threshold.min_relevance = Some(0.5);
        assert!(cache.get(&other_threshold).is_none());
    }

    #[test]
    fn lru_evicts_oldest() {
        let cache = SearchCache::with_capacity(1).unwrap();
        let first = SearchRequest::new(1, "first");
        let second = SearchRequest::new(1, "second");
        cache.insert(&first, &response(1));
        cache.insert(&second, &response(2));
        assert!(cache.get(&first).is_none());
        assert!(cache.get(&second).is_some());
    }
}
