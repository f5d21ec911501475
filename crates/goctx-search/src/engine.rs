//! The search engine: validate → embed once → dispatch → fuse → hydrate.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use goctx_core::enums::SearchMode;
use goctx_db::{ContextStore, ScoredChunk};
use goctx_embeddings::Embedder;

use crate::cache::SearchCache;
use crate::error::SearchError;
use crate::rrf;
use crate::types::{SearchRequest, SearchResponse, SearchResult};

/// Minimum per-lane fetch depth for hybrid fusion.
const HYBRID_FETCH_FLOOR: usize = 50;

/// Stateless search dispatcher over one store, aside from the optional
/// response cache.
pub struct SearchEngine {
    store: Arc<ContextStore>,
    embedder: Arc<dyn Embedder>,
    cache: Option<SearchCache>,
}

impl SearchEngine {
    /// `cache_capacity` 0 disables the response cache.
    #[must_use]
    pub fn new(
        store: Arc<ContextStore>,
        embedder: Arc<dyn Embedder>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            cache: SearchCache::with_capacity(cache_capacity),
        }
    }

    /// Execute one search request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArgument`] for an empty query or
    /// non-positive project id, [`SearchError::EmptyQuery`] when keyword
    /// sanitization leaves nothing, [`SearchError::Cancelled`] when
    /// `cancel` fires, and store/embedding errors otherwise. A failed
    /// search has no side effects.
    pub async fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, SearchError> {
        if request.query.trim().is_empty() {
            return Err(SearchError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }
        if request.project_id <= 0 {
            return Err(SearchError::InvalidArgument(format!(
                "project id must be positive, got {}",
                request.project_id
            )));
        }

        if request.use_cache
            && let Some(cache) = &self.cache
            && let Some(hit) = cache.get(request)
        {
            tracing::debug!(query = %request.query, "search cache hit");
            return Ok(hit);
        }

        let started = Instant::now();
        let limit = request.effective_limit();

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let query_vector = if matches!(request.mode, SearchMode::Vector | SearchMode::Hybrid) {
            let embedded = tokio::select! {
                () = cancel.cancelled() => return Err(SearchError::Cancelled),
                result = self.embedder.embed(vec![request.query.clone()]) => result?,
            };
            embedded.into_iter().next()
        } else {
            None
        };
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let (fused, vector_hits, text_hits) = match request.mode {
            SearchMode::Vector => {
                let vector = query_vector.as_deref().unwrap_or_default();
                let hits = self
                    .store
                    .search_vector(request.project_id, vector, limit, &request.filters)
                    .await?;
                let count = hits.len();
                (hits, count, 0)
            }
            SearchMode::Keyword => {
                let hits = self
                    .store
                    .search_text(request.project_id, &request.query, limit, &request.filters)
                    .await?;
                let count = hits.len();
                (hits, 0, count)
            }
            SearchMode::Hybrid => {
                let fetch = limit.max(HYBRID_FETCH_FLOOR);
                let vector = query_vector.as_deref().unwrap_or_default();
                let (vector_hits, text_hits) = tokio::join!(
                    self.store
                        .search_vector(request.project_id, vector, fetch, &request.filters),
                    self.store
                        .search_text(request.project_id, &request.query, fetch, &request.filters),
                );
                let vector_hits = vector_hits?;
                let text_hits = text_hits?;
                let counts = (vector_hits.len(), text_hits.len());
                let mut fused =
                    rrf::fuse(&vector_hits, &text_hits, request.effective_rrf_constant());
                fused.truncate(limit);
                (fused, counts.0, counts.1)
            }
        };

        let kept: Vec<ScoredChunk> = match request.min_relevance {
            Some(threshold) => fused
                .into_iter()
                .filter(|hit| hit.score >= threshold)
                .collect(),
            None => fused,
        };

        let results = self.hydrate(&kept).await?;
        let response = SearchResponse {
            total_results: results.len(),
            results,
            vector_hits,
            text_hits,
            search_duration_ms: u64::try_from(started.elapsed().as_millis())
                .unwrap_or(u64::MAX),
            cache_hit: false,
        };

        if request.use_cache && let Some(cache) = &self.cache {
            cache.insert(request, &response);
        }
        Ok(response)
    }

    /// One batched round trip: Chunk → File → (optional) Symbol.
    async fn hydrate(&self, hits: &[ScoredChunk]) -> Result<Vec<SearchResult>, SearchError> {
        let ids: Vec<i64> = hits.iter().map(|hit| hit.chunk_id).collect();
        let details = self.store.hydrate_chunks(&ids).await?;

        let mut results = Vec::with_capacity(details.len());
        for (position, (hit, detail)) in hits.iter().zip(details.into_iter()).enumerate() {
            results.push(SearchResult {
                rank: position as u32 + 1,
                relevance_score: hit.score,
                chunk_id: detail.chunk.id,
                file_path: detail.file_path,
                file_package: detail.file_package,
                start_line: detail.chunk.start_line,
                end_line: detail.chunk.end_line,
                content: detail.chunk.content,
                context_before: detail.chunk.context_before,
                context_after: detail.chunk.context_after,
                symbol: detail.symbol,
            });
        }
        Ok(results)
    }
}
