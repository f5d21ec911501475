//! The service itself: construction and the three operations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use goctx_config::{Config, EmbeddingProviderKind};
use goctx_core::enums::{DddRole, SearchMode, SymbolKind};
use goctx_db::{ContextStore, SearchFilters};
use goctx_embeddings::{Embedder, LocalEmbedder, RemoteEmbedder};
use goctx_indexer::{Chunker, IndexOptions, Indexer};
use goctx_search::{SearchEngine, SearchRequest};

use crate::error::ServiceError;
use crate::paths::project_db_path;
use crate::requests::{IndexCodebaseRequest, SearchCodeRequest, StatusRequest};
use crate::responses::{
    IndexCodebaseResponse, ResultContext, ResultFile, ResultSymbol, SearchCodeResponse,
    SearchCodeResult, StatusCounts, StatusHealth, StatusProject, StatusResponse,
};

/// One project's long-lived handles: store, embedder, indexer, engine.
///
/// Bound to a single repository root; cross-repository serving is out of
/// scope. Every request's `path` must resolve to this root.
pub struct ContextService {
    root: PathBuf,
    db_path: PathBuf,
    store: Arc<ContextStore>,
    engine: SearchEngine,
    indexer: Indexer,
}

impl ContextService {
    /// Open (or create) the project store for `root` and build the full
    /// stack from `config`. This is the single construction step; nothing
    /// else holds global state.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` when the store cannot be opened or the
    /// embedding backend cannot be constructed.
    pub async fn open(root: &Path, config: &Config) -> Result<Self, ServiceError> {
        let embedder: Arc<dyn Embedder> = match config.embedding.provider {
            EmbeddingProviderKind::Local => Arc::new(LocalEmbedder::new(&config.embedding.model)?),
            EmbeddingProviderKind::Remote => {
                if !config.embedding.remote_is_configured() {
                    return Err(ServiceError::InvalidArgument(
                        "remote embedding provider selected but no endpoint configured"
                            .to_string(),
                    ));
                }
                let api_key = std::env::var(&config.embedding.api_key_env).ok();
                Arc::new(RemoteEmbedder::new(
                    &config.embedding.endpoint,
                    &config.embedding.model,
                    api_key,
                    config.embedding.dimension,
                ))
            }
        };
        Self::with_embedder(root, config, embedder).await
    }

    /// Like [`ContextService::open`] with an injected embedding backend.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` when the store cannot be opened.
    pub async fn with_embedder(
        root: &Path,
        config: &Config,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, ServiceError> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let db_path = config
            .store
            .override_path()
            .unwrap_or_else(|| project_db_path(&root));
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServiceError::Index(goctx_indexer::IndexError::Io(e)))?;
        }

        let store = Arc::new(ContextStore::open(&db_path).await?);
        let strategy = match config.indexing.strategy.as_str() {
            "package_level" => goctx_core::enums::ChunkStrategy::PackageLevel,
            _ => goctx_core::enums::ChunkStrategy::FunctionLevel,
        };
        let chunker = Chunker::new(strategy, config.indexing.chunk_token_cap);
        let indexer = Indexer::new(
            Arc::clone(&store),
            Arc::clone(&embedder),
            chunker,
            config.indexing.max_workers,
            config.embedding.batch_size,
        );
        let engine = SearchEngine::new(
            Arc::clone(&store),
            embedder,
            config.search.cache_capacity,
        );

        Ok(Self {
            root,
            db_path,
            store,
            engine,
            indexer,
        })
    }

    /// The repository root this service is bound to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The backing store, for callers composing extra reads.
    #[must_use]
    pub fn store(&self) -> &Arc<ContextStore> {
        &self.store
    }

    fn resolve_request_path(&self, path: &str) -> Result<(), ServiceError> {
        let requested = PathBuf::from(path);
        let requested = requested
            .canonicalize()
            .unwrap_or_else(|_| requested.clone());
        if requested == self.root {
            Ok(())
        } else {
            Err(ServiceError::InvalidArgument(format!(
                "service is bound to {}, got {}",
                self.root.display(),
                requested.display()
            )))
        }
    }

    /// Operation `index_codebase`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Cancelled`] when cancelled before any file
    /// was dispatched; committed files persist either way. Run-level
    /// failures come back inside the response with `status = "error"`.
    pub async fn index_codebase(
        &self,
        request: &IndexCodebaseRequest,
        cancel: &CancellationToken,
    ) -> Result<IndexCodebaseResponse, ServiceError> {
        self.resolve_request_path(&request.path)?;
        let options = IndexOptions {
            force_reindex: request.force_reindex,
            include_tests: request.include_tests,
            include_vendor: request.include_vendor,
        };

        match self.indexer.index_project(&self.root, options, cancel).await {
            Ok(report) => {
                let status = if report.files_failed > 0 {
                    "partial"
                } else {
                    "success"
                };
                Ok(IndexCodebaseResponse {
                    status: status.to_string(),
                    files_indexed: report.files_indexed,
                    files_skipped: report.files_skipped,
                    files_failed: report.files_failed,
                    chunks_created: report.chunks_created,
                    embeddings_generated: report.embeddings_generated,
                    duration_ms: report.duration_ms,
                    errors: report.errors,
                })
            }
            Err(goctx_indexer::IndexError::Cancelled) => Err(ServiceError::Cancelled),
            Err(e) => Ok(IndexCodebaseResponse {
                status: "error".to_string(),
                files_indexed: 0,
                files_skipped: 0,
                files_failed: 0,
                chunks_created: 0,
                embeddings_generated: 0,
                duration_ms: 0,
                errors: vec![goctx_indexer::FileFailure {
                    path: self.root.display().to_string(),
                    message: e.to_string(),
                }],
            }),
        }
    }

    /// Operation `search_code`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ProjectNotIndexed`] when the root was never
    /// indexed, [`ServiceError::InvalidArgument`] for unknown modes or
    /// filter names, and search errors otherwise.
    pub async fn search_code(
        &self,
        request: &SearchCodeRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchCodeResponse, ServiceError> {
        self.resolve_request_path(&request.path)?;

        let root_str = self.root.display().to_string();
        let project = self
            .store
            .get_project_by_root(&root_str)
            .await?
            .ok_or_else(|| ServiceError::ProjectNotIndexed(root_str.clone()))?;

        let mode = parse_mode(&request.search_mode)?;
        let (filters, min_relevance) = convert_filters(request.filters.as_ref())?;

        let mut engine_request = SearchRequest::new(project.id, request.query.clone());
        engine_request.limit = request.limit;
        engine_request.mode = mode;
        engine_request.filters = filters;
        engine_request.min_relevance = min_relevance;

        let response = self.engine.search(&engine_request, cancel).await?;
        Ok(SearchCodeResponse {
            total_results: response.total_results,
            search_duration_ms: response.search_duration_ms,
            cache_hit: response.cache_hit,
            results: response
                .results
                .into_iter()
                .map(|result| SearchCodeResult {
                    rank: result.rank,
                    relevance_score: result.relevance_score,
                    symbol: result.symbol.map(|symbol| ResultSymbol {
                        name: symbol.name,
                        kind: symbol.kind.as_str().to_string(),
                        package: symbol.package_name,
                        signature: symbol.signature,
                    }),
                    file: ResultFile {
                        path: result.file_path,
                        start_line: result.start_line,
                        end_line: result.end_line,
                        package: result.file_package,
                    },
                    content: result.content,
                    context: ResultContext {
                        before: result.context_before,
                        after: result.context_after,
                    },
                })
                .collect(),
        })
    }

    /// Operation `get_status`.
    ///
    /// # Errors
    ///
    /// Returns store errors only; an unindexed project is a normal
    /// `indexed = false` response.
    pub async fn get_status(&self, request: &StatusRequest) -> Result<StatusResponse, ServiceError> {
        self.resolve_request_path(&request.path)?;

        let root_str = self.root.display().to_string();
        let project = self.store.get_project_by_root(&root_str).await?;

        let Some(project) = project else {
            return Ok(StatusResponse {
                indexed: false,
                project: None,
                counts: StatusCounts::default(),
                index_size_mb: self.index_size_mb(),
                health: StatusHealth {
                    database_accessible: true,
                    embeddings_available: false,
                    fts_indexes_built: true,
                },
            });
        };

        let status = self.store.get_status(project.id).await?;
        Ok(StatusResponse {
            indexed: project.last_indexed_at.is_some(),
            project: Some(StatusProject {
                root_path: project.root_path,
                module_name: project.module_name,
                total_files: project.total_files,
                total_chunks: project.total_chunks,
                last_indexed_at: project.last_indexed_at,
            }),
            counts: StatusCounts {
                files: status.files,
                symbols: status.symbols,
                chunks: status.chunks,
                embeddings: status.embeddings,
            },
            index_size_mb: self.index_size_mb(),
            health: StatusHealth {
                database_accessible: true,
                embeddings_available: status.embeddings > 0,
                fts_indexes_built: status.fts_indexes_built,
            },
        })
    }

    fn index_size_mb(&self) -> f64 {
        std::fs::metadata(&self.db_path)
            .map(|meta| meta.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0)
    }
}

fn parse_mode(mode: &str) -> Result<SearchMode, ServiceError> {
    match mode {
        "vector" => Ok(SearchMode::Vector),
        "keyword" => Ok(SearchMode::Keyword),
        "hybrid" => Ok(SearchMode::Hybrid),
        other => Err(ServiceError::InvalidArgument(format!(
            "unknown search mode: {other}"
        ))),
    }
}

fn convert_filters(
    filters: Option<&crate::requests::SearchFiltersRequest>,
) -> Result<(SearchFilters, Option<f64>), ServiceError> {
    let Some(filters) = filters else {
        return Ok((SearchFilters::default(), None));
    };

    let mut symbol_kinds = Vec::with_capacity(filters.symbol_types.len());
    for name in &filters.symbol_types {
        let kind: SymbolKind = serde_json::from_value(serde_json::Value::String(name.clone()))
            .map_err(|_| {
                ServiceError::InvalidArgument(format!("unknown symbol type: {name}"))
            })?;
        symbol_kinds.push(kind);
    }

    let mut ddd_roles = Vec::with_capacity(filters.ddd_patterns.len());
    for name in &filters.ddd_patterns {
        let role = DddRole::from_name(name).ok_or_else(|| {
            ServiceError::InvalidArgument(format!("unknown ddd pattern: {name}"))
        })?;
        ddd_roles.push(role);
    }

    Ok((
        SearchFilters {
            symbol_kinds,
            packages: filters.packages.clone(),
            file_pattern: filters.file_pattern.clone(),
            ddd_roles,
        },
        filters.min_relevance,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use goctx_embeddings::testing::HashEmbedder;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn fixture_repo() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        write(root, "go.mod", "module example.com/shop\n\ngo 1.22\n");
        write(
            root,
            "order.go",
            "package shop\n\n// CreateOrder builds an order.\nfunc CreateOrder(id string) string {\n\treturn id\n}\n",
        );
        write(
            root,
            "repo.go",
            "package shop\n\ntype OrderRepository interface {\n\tFind(id string) string\n}\n",
        );
        dir
    }

    async fn service_for(repo: &tempfile::TempDir, db_dir: &tempfile::TempDir) -> ContextService {
        let mut config = Config::default();
        config.store.path = db_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .into_owned();
        config.search.cache_capacity = 8;
        ContextService::with_embedder(repo.path(), &config, Arc::new(HashEmbedder::new(8)))
            .await
            .unwrap()
    }

    fn root_str(service: &ContextService) -> String {
        service.root().display().to_string()
    }

    #[tokio::test]
    async fn index_then_status_then_search() {
        let repo = fixture_repo();
        let db_dir = tempfile::TempDir::new().unwrap();
        let service = service_for(&repo, &db_dir).await;
        let cancel = CancellationToken::new();
        let path = root_str(&service);

        // Unindexed status first.
        let status = service
            .get_status(&StatusRequest { path: path.clone() })
            .await
            .unwrap();
        assert!(!status.indexed);
        assert!(status.project.is_none());

        let indexed = service
            .index_codebase(
                &IndexCodebaseRequest {
                    path: path.clone(),
                    force_reindex: false,
                    include_tests: true,
                    include_vendor: false,
                },
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(indexed.status, "success");
        assert_eq!(indexed.files_indexed, 2);
        assert!(indexed.chunks_created >= 2);
        assert_eq!(indexed.embeddings_generated, indexed.chunks_created);

        let status = service
            .get_status(&StatusRequest { path: path.clone() })
            .await
            .unwrap();
        assert!(status.indexed);
        let project = status.project.unwrap();
        assert_eq!(project.module_name, "example.com/shop");
        assert_eq!(status.counts.files, 2);
        assert!(status.health.database_accessible);
        assert!(status.health.embeddings_available);
        assert!(status.health.fts_indexes_built);
        assert!(status.index_size_mb > 0.0);

        let found = service
            .search_code(
                &SearchCodeRequest {
                    path: path.clone(),
                    query: "CreateOrder".to_string(),
                    limit: 10,
                    search_mode: "keyword".to_string(),
                    filters: None,
                },
                &cancel,
            )
            .await
            .unwrap();
        assert!(found.total_results > 0);
        assert_eq!(found.results[0].rank, 1);
        assert!(found.results[0].content.contains("CreateOrder"));
        assert!(found.results[0].file.path.ends_with(".go"));
        assert!(found.results[0].context.before.contains("package shop"));
    }

    #[tokio::test]
    async fn search_before_index_is_project_not_indexed() {
        let repo = fixture_repo();
        let db_dir = tempfile::TempDir::new().unwrap();
        let service = service_for(&repo, &db_dir).await;
        let path = root_str(&service);

        let err = service
            .search_code(
                &SearchCodeRequest {
                    path,
                    query: "order".to_string(),
                    limit: 10,
                    search_mode: "hybrid".to_string(),
                    filters: None,
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProjectNotIndexed(_)));
    }

    #[tokio::test]
    async fn unknown_mode_and_filters_are_invalid_arguments() {
        let repo = fixture_repo();
        let db_dir = tempfile::TempDir::new().unwrap();
        let service = service_for(&repo, &db_dir).await;
        let cancel = CancellationToken::new();
        let path = root_str(&service);

        service
            .index_codebase(
                &IndexCodebaseRequest {
                    path: path.clone(),
                    force_reindex: false,
                    include_tests: true,
                    include_vendor: false,
                },
                &cancel,
            )
            .await
            .unwrap();

        let err = service
            .search_code(
                &SearchCodeRequest {
                    path: path.clone(),
                    query: "order".to_string(),
                    limit: 10,
                    search_mode: "fuzzy".to_string(),
                    filters: None,
                },
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let err = service
            .search_code(
                &SearchCodeRequest {
                    path,
                    query: "order".to_string(),
                    limit: 10,
                    search_mode: "keyword".to_string(),
                    filters: Some(crate::requests::SearchFiltersRequest {
                        ddd_patterns: vec!["mystery".to_string()],
                        ..Default::default()
                    }),
                },
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn wrong_path_is_rejected() {
        let repo = fixture_repo();
        let other = tempfile::TempDir::new().unwrap();
        let db_dir = tempfile::TempDir::new().unwrap();
        let service = service_for(&repo, &db_dir).await;

        let err = service
            .get_status(&StatusRequest {
                path: other.path().display().to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn ddd_filter_restricts_results() {
        let repo = fixture_repo();
        let db_dir = tempfile::TempDir::new().unwrap();
        let service = service_for(&repo, &db_dir).await;
        let cancel = CancellationToken::new();
        let path = root_str(&service);

        service
            .index_codebase(
                &IndexCodebaseRequest {
                    path: path.clone(),
                    force_reindex: false,
                    include_tests: true,
                    include_vendor: false,
                },
                &cancel,
            )
            .await
            .unwrap();

        let found = service
            .search_code(
                &SearchCodeRequest {
                    path,
                    query: "OrderRepository".to_string(),
                    limit: 10,
                    search_mode: "keyword".to_string(),
                    filters: Some(crate::requests::SearchFiltersRequest {
                        ddd_patterns: vec!["repository".to_string()],
                        ..Default::default()
                    }),
                },
                &cancel,
            )
            .await
            .unwrap();
        assert!(found.total_results >= 1);
        for result in &found.results {
            let symbol = result.symbol.as_ref().expect("ddd-filtered hits own symbols");
            assert_eq!(symbol.name, "OrderRepository");
        }
    }
}
