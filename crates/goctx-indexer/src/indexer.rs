//! The indexing pipeline.
//!
//! Per file: hash → (unchanged → skip) → parse → chunk → embed → one
//! store transaction. Files fan out across a bounded worker pool; the
//! store's write lane is the only synchronization point. Per-file failures
//! are recorded in the report, never fatal; a cancelled run keeps every
//! file already committed.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use goctx_core::entities::{NewEmbedding, NewFile, NewImport, NewSymbol};
use goctx_core::hash::bytes_hash;
use goctx_db::retry::{RetryConfig, with_retry};
use goctx_db::{ContextStore, StoreError};
use goctx_embeddings::Embedder;
use goctx_parser::parse_go_source;

use crate::chunker::{Chunker, DraftChunk};
use crate::error::IndexError;
use crate::walk::collect_go_files;

/// Flags of one index request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndexOptions {
    pub force_reindex: bool,
    pub include_tests: bool,
    pub include_vendor: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            force_reindex: false,
            include_tests: true,
            include_vendor: false,
        }
    }
}

/// One unrecoverable per-file failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileFailure {
    pub path: String,
    pub message: String,
}

/// Aggregated outcome of an index run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexReport {
    pub files_indexed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub chunks_created: u64,
    pub embeddings_generated: u64,
    pub duration_ms: u64,
    pub errors: Vec<FileFailure>,
}

enum FileOutcome {
    Indexed { chunks: u64, embeddings: u64 },
    Skipped,
    Failed(FileFailure),
    Cancelled,
}

/// Orchestrates parse → chunk → embed → store for a project tree.
pub struct Indexer {
    store: Arc<ContextStore>,
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
    max_workers: usize,
    batch_size: usize,
    retry: RetryConfig,
}

impl Indexer {
    #[must_use]
    pub fn new(
        store: Arc<ContextStore>,
        embedder: Arc<dyn Embedder>,
        chunker: Chunker,
        max_workers: usize,
        batch_size: usize,
    ) -> Self {
        let cpus = std::thread::available_parallelism().map_or(4, std::num::NonZero::get);
        Self {
            store,
            embedder,
            chunker,
            max_workers: max_workers.clamp(1, cpus.max(1)),
            batch_size: batch_size.max(1),
            retry: RetryConfig::default(),
        }
    }

    /// Index the repository rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cancelled`] when cancelled before any file was
    /// dispatched, and store errors for project bookkeeping failures.
    /// Per-file errors land in the report instead.
    pub async fn index_project(
        &self,
        root: &Path,
        options: IndexOptions,
        cancel: &CancellationToken,
    ) -> Result<IndexReport, IndexError> {
        let started = Instant::now();
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let root_str = root.display().to_string();

        let (module_name, go_version) = read_go_mod(&root);
        let project = match self.store.get_project_by_root(&root_str).await? {
            Some(existing) => existing,
            None => {
                self.store
                    .create_project(&root_str, &module_name, &go_version)
                    .await?
            }
        };

        let files = collect_go_files(&root, options.include_tests, options.include_vendor, cancel)?;
        self.prune_deleted_files(project.id, &files).await?;

        tracing::info!(
            project = %root_str,
            files = files.len(),
            workers = self.max_workers,
            "index run starting"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let ctx = Arc::new(WorkerCtx {
            store: Arc::clone(&self.store),
            embedder: Arc::clone(&self.embedder),
            chunker: self.chunker,
            retry: self.retry.clone(),
            project_id: project.id,
            root: root.clone(),
            force: options.force_reindex,
            batch_size: self.batch_size,
            cancel: cancel.clone(),
        });

        let mut tasks = tokio::task::JoinSet::new();
        for rel in files {
            let ctx = Arc::clone(&ctx);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return FileOutcome::Cancelled;
                };
                if ctx.cancel.is_cancelled() {
                    return FileOutcome::Cancelled;
                }
                process_file(&ctx, &rel).await
            });
        }

        let mut report = IndexReport::default();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.unwrap_or_else(|e| {
                FileOutcome::Failed(FileFailure {
                    path: String::new(),
                    message: format!("worker panicked: {e}"),
                })
            });
            match outcome {
                FileOutcome::Indexed { chunks, embeddings } => {
                    report.files_indexed += 1;
                    report.chunks_created += chunks;
                    report.embeddings_generated += embeddings;
                }
                FileOutcome::Skipped => report.files_skipped += 1,
                FileOutcome::Failed(failure) => {
                    report.files_failed += 1;
                    report.errors.push(failure);
                }
                // Committed work persists; the file itself is simply not
                // accounted as indexed.
                FileOutcome::Cancelled => {}
            }
        }

        let status = self.store.get_status(project.id).await?;
        self.store
            .update_project(
                project.id,
                &module_name,
                &go_version,
                status.files,
                status.chunks,
            )
            .await?;

        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            indexed = report.files_indexed,
            skipped = report.files_skipped,
            failed = report.files_failed,
            chunks = report.chunks_created,
            duration_ms = report.duration_ms,
            "index run finished"
        );
        Ok(report)
    }

    /// Drop store rows for files no longer present on disk; children
    /// cascade.
    async fn prune_deleted_files(
        &self,
        project_id: i64,
        walked: &[PathBuf],
    ) -> Result<(), IndexError> {
        let walked: HashSet<String> = walked
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        for stored in self.store.list_files(project_id).await? {
            if !walked.contains(&stored.file_path) {
                tracing::debug!(path = %stored.file_path, "pruning deleted file");
                self.store.delete_file(stored.id).await?;
            }
        }
        Ok(())
    }
}

struct WorkerCtx {
    store: Arc<ContextStore>,
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
    retry: RetryConfig,
    project_id: i64,
    root: PathBuf,
    force: bool,
    batch_size: usize,
    cancel: CancellationToken,
}

async fn process_file(ctx: &WorkerCtx, rel: &Path) -> FileOutcome {
    let rel_str = rel.to_string_lossy().into_owned();
    let abs = ctx.root.join(rel);

    let bytes = match tokio::fs::read(&abs).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return FileOutcome::Failed(FileFailure {
                path: rel_str,
                message: format!("read failed: {e}"),
            });
        }
    };
    let (mod_time, size_bytes) = match file_metadata(&abs).await {
        Ok(meta) => meta,
        Err(e) => {
            return FileOutcome::Failed(FileFailure {
                path: rel_str,
                message: format!("stat failed: {e}"),
            });
        }
    };

    let content_hash = bytes_hash(&bytes);
    if !ctx.force {
        match ctx.store.get_file(ctx.project_id, &rel_str).await {
            Ok(Some(existing))
                if existing.content_hash == content_hash
                    && existing.mod_time.timestamp() == mod_time.timestamp() =>
            {
                tracing::debug!(path = %rel_str, "unchanged, skipping");
                return FileOutcome::Skipped;
            }
            Ok(_) => {}
            Err(e) => {
                return FileOutcome::Failed(FileFailure {
                    path: rel_str,
                    message: format!("lookup failed: {e}"),
                });
            }
        }
    }

    let source = String::from_utf8_lossy(&bytes).into_owned();
    let parse = parse_go_source(&source);
    if !parse.errors.is_empty() {
        tracing::debug!(path = %rel_str, errors = parse.errors.len(),
            "parsed with syntax errors, indexing partial symbols");
    }
    let drafts = ctx.chunker.chunk_source(&source, &parse);

    let Some(vectors) = embed_drafts(ctx, &drafts).await else {
        return FileOutcome::Cancelled;
    };

    // Symbols the store cannot represent are dropped here, not at commit.
    let symbols: Vec<(usize, &NewSymbol)> = parse
        .symbols
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            if s.has_valid_span() {
                true
            } else {
                tracing::warn!(path = %rel_str, symbol = %s.name, "dropping symbol with invalid span");
                false
            }
        })
        .collect();

    let file = NewFile {
        project_id: ctx.project_id,
        file_path: rel_str.clone(),
        package_name: parse.package_name.clone(),
        content_hash,
        mod_time,
        size_bytes,
        parse_error: parse.error_summary(),
    };

    let persisted = with_retry(&ctx.retry, || {
        persist_file(ctx, &file, &parse.imports, &symbols, &drafts, &vectors)
    })
    .await;

    match persisted {
        Ok((chunks, embeddings)) => FileOutcome::Indexed { chunks, embeddings },
        Err(e) => FileOutcome::Failed(FileFailure {
            path: rel_str,
            message: format!("store failed: {e}"),
        }),
    }
}

/// Embed every draft's full content in batches. `None` means cancelled.
async fn embed_drafts(ctx: &WorkerCtx, drafts: &[DraftChunk]) -> Option<Vec<Option<Vec<f32>>>> {
    let texts: Vec<String> = drafts.iter().map(|d| d.chunk.full_content()).collect();
    let mut vectors: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());

    for batch in texts.chunks(ctx.batch_size) {
        if ctx.cancel.is_cancelled() {
            return None;
        }
        let embedded = tokio::select! {
            () = ctx.cancel.cancelled() => return None,
            result = ctx.embedder.embed(batch.to_vec()) => result,
        };
        match embedded {
            Ok(batch_vectors) => vectors.extend(batch_vectors.into_iter().map(Some)),
            Err(e) => {
                // The affected chunks stay keyword-searchable.
                tracing::warn!(%e, "embedding batch failed, indexing without vectors");
                vectors.extend(std::iter::repeat_with(|| None).take(batch.len()));
            }
        }
    }
    Some(vectors)
}

/// One transaction: file row, imports (replaced wholesale), symbols,
/// chunks with their embeddings, then stale-chunk pruning.
async fn persist_file(
    ctx: &WorkerCtx,
    file: &NewFile,
    imports: &[NewImport],
    symbols: &[(usize, &NewSymbol)],
    drafts: &[DraftChunk],
    vectors: &[Option<Vec<f32>>],
) -> Result<(u64, u64), StoreError> {
    let tx = ctx.store.begin_tx().await?;

    let stored_file = tx.upsert_file(file).await?;

    tx.delete_imports_by_file(stored_file.id).await?;
    for import in imports {
        tx.upsert_import(stored_file.id, import).await?;
    }

    // Symbols are refreshed wholesale so renames and moved declarations
    // leave no stale rows; chunk links are rewritten below.
    tx.delete_symbols_by_file(stored_file.id).await?;
    let mut symbol_ids: HashMap<usize, i64> = HashMap::with_capacity(symbols.len());
    for (index, symbol) in symbols {
        let stored = tx.upsert_symbol(stored_file.id, symbol).await?;
        symbol_ids.insert(*index, stored.id);
    }

    let mut kept_chunk_ids = Vec::with_capacity(drafts.len());
    let mut chunks_created = 0_u64;
    let mut embeddings_generated = 0_u64;
    for (draft, vector) in drafts.iter().zip(vectors.iter()) {
        let mut chunk = draft.chunk.clone();
        chunk.symbol_id = draft
            .symbol_index
            .and_then(|index| symbol_ids.get(&index).copied());
        let stored = tx.upsert_chunk(stored_file.id, &chunk).await?;
        kept_chunk_ids.push(stored.id);
        chunks_created += 1;

        if let Some(vector) = vector {
            tx.upsert_embedding(
                stored.id,
                &NewEmbedding {
                    vector: vector.clone(),
                    provider: ctx.embedder.provider().to_string(),
                    model: ctx.embedder.model().to_string(),
                },
            )
            .await?;
            embeddings_generated += 1;
        }
    }

    let kept: HashSet<i64> = kept_chunk_ids.into_iter().collect();
    let stale: Vec<i64> = tx
        .list_chunks_by_file(stored_file.id)
        .await?
        .into_iter()
        .filter(|chunk| !kept.contains(&chunk.id))
        .map(|chunk| chunk.id)
        .collect();
    tx.delete_chunks_batch(&stale).await?;

    tx.commit().await?;
    Ok((chunks_created, embeddings_generated))
}

async fn file_metadata(path: &Path) -> std::io::Result<(DateTime<Utc>, i64)> {
    let metadata = tokio::fs::metadata(path).await?;
    let mod_time = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    let size = i64::try_from(metadata.len()).unwrap_or(i64::MAX);
    Ok((mod_time, size))
}

/// Pull `module` and `go` directives out of `go.mod`, if present.
fn read_go_mod(root: &Path) -> (String, String) {
    let Ok(content) = std::fs::read_to_string(root.join("go.mod")) else {
        return (String::new(), String::new());
    };
    let mut module = String::new();
    let mut version = String::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("module ") {
            module = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("go ") {
            version = rest.trim().to_string();
        }
    }
    (module, version)
}
