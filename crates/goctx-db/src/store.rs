//! The store capability surface.
//!
//! [`ContextStore`] owns the database handle and exposes every read, write,
//! transactional, and search operation. Writes briefly hold the write lane;
//! [`ContextStore::begin_tx`] hands the lane to a [`StoreTx`] for its whole
//! scope, so writers serialize and the transaction handle cannot nest.

use std::path::Path;

use goctx_core::entities::{
    Chunk, Embedding, FileRecord, Import, NewChunk, NewEmbedding, NewFile, NewImport, NewSymbol,
    Project, Symbol,
};
use goctx_core::enums::SymbolKind;
use serde::{Deserialize, Serialize};

use crate::db::ContextDb;
use crate::error::StoreError;
use crate::ops;
use crate::search::{ScoredChunk, SearchFilters};
use crate::tx::StoreTx;

/// Row counts and index health for one project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreStatus {
    pub files: i64,
    pub symbols: i64,
    pub chunks: i64,
    pub embeddings: i64,
    pub fts_indexes_built: bool,
}

/// Symbol metadata carried on a hydrated search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolSummary {
    pub name: String,
    pub kind: SymbolKind,
    pub package_name: String,
    pub signature: String,
}

/// A chunk joined with its file and (optional) owning symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkDetails {
    pub chunk: Chunk,
    pub file_path: String,
    pub file_package: String,
    pub symbol: Option<SymbolSummary>,
}

/// The persistent store.
pub struct ContextStore {
    db: ContextDb,
}

impl ContextStore {
    /// Open (creating if absent) the database at `path` and run migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on open, pragma, or migration failure.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            db: ContextDb::open_local(path).await?,
        })
    }

    /// Wrap an already-open database handle.
    #[must_use]
    pub const fn from_db(db: ContextDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ContextDb {
        &self.db
    }

    const fn conn(&self) -> &libsql::Connection {
        self.db.conn()
    }

    /// Begin a transaction. The returned handle exposes the same capability
    /// set, holds the write lane for its scope, and has no `begin_tx` of its
    /// own.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedNesting`] when a transaction is
    /// already open on this connection.
    pub async fn begin_tx(&self) -> Result<StoreTx<'_>, StoreError> {
        StoreTx::begin(&self.db).await
    }

    // ── Reads ─────────────────────────────────────────────────────

    pub async fn get_project_by_root(&self, root: &str) -> Result<Option<Project>, StoreError> {
        ops::project::get_project_by_root(self.conn(), root).await
    }

    pub async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>, StoreError> {
        ops::project::get_project_by_id(self.conn(), id).await
    }

    pub async fn get_file(
        &self,
        project_id: i64,
        file_path: &str,
    ) -> Result<Option<FileRecord>, StoreError> {
        ops::file::get_file(self.conn(), project_id, file_path).await
    }

    pub async fn get_file_by_id(&self, id: i64) -> Result<Option<FileRecord>, StoreError> {
        ops::file::get_file_by_id(self.conn(), id).await
    }

    pub async fn list_files(&self, project_id: i64) -> Result<Vec<FileRecord>, StoreError> {
        ops::file::list_files(self.conn(), project_id).await
    }

    pub async fn get_symbol(&self, id: i64) -> Result<Option<Symbol>, StoreError> {
        ops::symbol::get_symbol(self.conn(), id).await
    }

    pub async fn list_symbols_by_file(&self, file_id: i64) -> Result<Vec<Symbol>, StoreError> {
        ops::symbol::list_symbols_by_file(self.conn(), file_id).await
    }

    pub async fn get_chunk(&self, id: i64) -> Result<Option<Chunk>, StoreError> {
        ops::chunk::get_chunk(self.conn(), id).await
    }

    pub async fn list_chunks_by_file(&self, file_id: i64) -> Result<Vec<Chunk>, StoreError> {
        ops::chunk::list_chunks_by_file(self.conn(), file_id).await
    }

    pub async fn get_embedding(&self, chunk_id: i64) -> Result<Option<Embedding>, StoreError> {
        ops::embedding::get_embedding(self.conn(), chunk_id).await
    }

    pub async fn list_imports_by_file(&self, file_id: i64) -> Result<Vec<Import>, StoreError> {
        ops::import::list_imports_by_file(self.conn(), file_id).await
    }

    pub async fn get_status(&self, project_id: i64) -> Result<StoreStatus, StoreError> {
        ops::status::get_status(self.conn(), project_id).await
    }

    pub async fn hydrate_chunks(&self, ids: &[i64]) -> Result<Vec<ChunkDetails>, StoreError> {
        ops::chunk::hydrate_chunks(self.conn(), ids).await
    }

    // ── Search ────────────────────────────────────────────────────

    pub async fn search_vector(
        &self,
        project_id: i64,
        query_vec: &[f32],
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<ScoredChunk>, StoreError> {
        ops::search::search_vector(self.conn(), project_id, query_vec, limit, filters).await
    }

    pub async fn search_text(
        &self,
        project_id: i64,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<ScoredChunk>, StoreError> {
        ops::search::search_text(self.conn(), project_id, query, limit, filters).await
    }

    pub async fn search_symbols_text(
        &self,
        project_id: i64,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(i64, f64)>, StoreError> {
        ops::search::search_symbols_text(self.conn(), project_id, query, limit).await
    }

    // ── Writes (auto-commit lane) ─────────────────────────────────

    pub async fn create_project(
        &self,
        root_path: &str,
        module_name: &str,
        go_version: &str,
    ) -> Result<Project, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::project::create_project(self.conn(), root_path, module_name, go_version).await
    }

    pub async fn update_project(
        &self,
        id: i64,
        module_name: &str,
        go_version: &str,
        total_files: i64,
        total_chunks: i64,
    ) -> Result<Project, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::project::update_project(
            self.conn(),
            id,
            module_name,
            go_version,
            total_files,
            total_chunks,
        )
        .await
    }

    pub async fn upsert_file(&self, file: &NewFile) -> Result<FileRecord, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::file::upsert_file(self.conn(), file).await
    }

    pub async fn delete_file(&self, id: i64) -> Result<u64, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::file::delete_file(self.conn(), id).await
    }

    pub async fn upsert_symbol(
        &self,
        file_id: i64,
        symbol: &NewSymbol,
    ) -> Result<Symbol, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::symbol::upsert_symbol(self.conn(), file_id, symbol).await
    }

    pub async fn delete_symbols_by_file(&self, file_id: i64) -> Result<u64, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::symbol::delete_symbols_by_file(self.conn(), file_id).await
    }

    pub async fn upsert_chunk(&self, file_id: i64, chunk: &NewChunk) -> Result<Chunk, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::chunk::upsert_chunk(self.conn(), file_id, chunk).await
    }

    pub async fn delete_chunk(&self, id: i64) -> Result<u64, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::chunk::delete_chunk(self.conn(), id).await
    }

    pub async fn delete_chunks_batch(&self, ids: &[i64]) -> Result<u64, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::chunk::delete_chunks_batch(self.conn(), ids).await
    }

    pub async fn delete_chunks_by_file(&self, file_id: i64) -> Result<u64, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::chunk::delete_chunks_by_file(self.conn(), file_id).await
    }

    pub async fn upsert_embedding(
        &self,
        chunk_id: i64,
        embedding: &NewEmbedding,
    ) -> Result<Embedding, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::embedding::upsert_embedding(self.conn(), chunk_id, embedding).await
    }

    pub async fn delete_embedding(&self, chunk_id: i64) -> Result<u64, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::embedding::delete_embedding(self.conn(), chunk_id).await
    }

    pub async fn upsert_import(
        &self,
        file_id: i64,
        import: &NewImport,
    ) -> Result<Import, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::import::upsert_import(self.conn(), file_id, import).await
    }

    pub async fn delete_imports_by_file(&self, file_id: i64) -> Result<u64, StoreError> {
        let _lane = self.db.write_lane.lock().await;
        ops::import::delete_imports_by_file(self.conn(), file_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{test_chunk, test_file, test_store, test_symbol};
    use goctx_core::entities::NewEmbedding;
    use goctx_core::enums::SymbolKind;

    #[tokio::test]
    async fn cascade_delete_file_removes_children() {
        let store = test_store().await;
        let project = store.create_project("/repo", "", "").await.unwrap();
        let file = store
            .upsert_file(&test_file(project.id, "a.go", "h"))
            .await
            .unwrap();
        store
            .upsert_symbol(file.id, &test_symbol("A", SymbolKind::Function, 3))
            .await
            .unwrap();
        let chunk = store
            .upsert_chunk(file.id, &test_chunk("func A() {}", 3, 5))
            .await
            .unwrap();
        store
            .upsert_embedding(
                chunk.id,
                &NewEmbedding {
                    vector: vec![1.0, 0.0],
                    provider: "test".to_string(),
                    model: "m".to_string(),
                },
            )
            .await
            .unwrap();
        store
            .upsert_import(
                file.id,
                &goctx_core::entities::NewImport {
                    import_path: "fmt".to_string(),
                    alias: String::new(),
                },
            )
            .await
            .unwrap();

        store.delete_file(file.id).await.unwrap();

        assert!(store.list_symbols_by_file(file.id).await.unwrap().is_empty());
        assert!(store.list_chunks_by_file(file.id).await.unwrap().is_empty());
        assert!(store.list_imports_by_file(file.id).await.unwrap().is_empty());
        assert!(store.get_embedding(chunk.id).await.unwrap().is_none());

        // FTS rows are purged by the delete triggers.
        let mut rows = store
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM chunks_fts", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_chunk_cascades_to_embedding() {
        let store = test_store().await;
        let project = store.create_project("/repo", "", "").await.unwrap();
        let file = store
            .upsert_file(&test_file(project.id, "a.go", "h"))
            .await
            .unwrap();
        let chunk = store
            .upsert_chunk(file.id, &test_chunk("body", 1, 2))
            .await
            .unwrap();
        store
            .upsert_embedding(
                chunk.id,
                &NewEmbedding {
                    vector: vec![1.0],
                    provider: "test".to_string(),
                    model: "m".to_string(),
                },
            )
            .await
            .unwrap();

        store.delete_chunk(chunk.id).await.unwrap();
        assert!(store.get_embedding(chunk.id).await.unwrap().is_none());
    }
}
