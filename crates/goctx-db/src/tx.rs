//! Scoped transaction handle.
//!
//! A [`StoreTx`] exposes the same capability set as
//! [`crate::ContextStore`] but scoped to one transaction: reads see the
//! transaction's own uncommitted writes; outside observers see them only
//! after [`StoreTx::commit`]. The handle holds the write lane for its whole
//! scope and deliberately has no `begin_tx` — nesting is unrepresentable at
//! compile time, and a raw re-entrant BEGIN surfaces as
//! [`StoreError::UnsupportedNesting`] at runtime.

use goctx_core::entities::{
    Chunk, Embedding, FileRecord, Import, NewChunk, NewEmbedding, NewFile, NewImport, NewSymbol,
    Project, Symbol,
};
use tokio::sync::MutexGuard;

use crate::db::ContextDb;
use crate::error::StoreError;
use crate::ops;
use crate::store::StoreStatus;

/// An open transaction over the store.
pub struct StoreTx<'a> {
    tx: libsql::Transaction,
    _lane: MutexGuard<'a, ()>,
}

impl<'a> StoreTx<'a> {
    pub(crate) async fn begin(db: &'a ContextDb) -> Result<Self, StoreError> {
        let lane = db.write_lane.lock().await;
        let tx = db.conn().transaction().await?;
        Ok(Self { tx, _lane: lane })
    }

    /// Commit; all writes become visible atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the commit fails; the transaction is rolled
    /// back by the underlying store.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Roll back; no write survives.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the rollback itself fails.
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }

    // ── Reads (see own uncommitted writes) ────────────────────────

    pub async fn get_project_by_root(&self, root: &str) -> Result<Option<Project>, StoreError> {
        ops::project::get_project_by_root(&self.tx, root).await
    }

    pub async fn get_file(
        &self,
        project_id: i64,
        file_path: &str,
    ) -> Result<Option<FileRecord>, StoreError> {
        ops::file::get_file(&self.tx, project_id, file_path).await
    }

    pub async fn get_file_by_id(&self, id: i64) -> Result<Option<FileRecord>, StoreError> {
        ops::file::get_file_by_id(&self.tx, id).await
    }

    pub async fn list_files(&self, project_id: i64) -> Result<Vec<FileRecord>, StoreError> {
        ops::file::list_files(&self.tx, project_id).await
    }

    pub async fn get_symbol(&self, id: i64) -> Result<Option<Symbol>, StoreError> {
        ops::symbol::get_symbol(&self.tx, id).await
    }

    pub async fn list_symbols_by_file(&self, file_id: i64) -> Result<Vec<Symbol>, StoreError> {
        ops::symbol::list_symbols_by_file(&self.tx, file_id).await
    }

    pub async fn get_chunk(&self, id: i64) -> Result<Option<Chunk>, StoreError> {
        ops::chunk::get_chunk(&self.tx, id).await
    }

    pub async fn list_chunks_by_file(&self, file_id: i64) -> Result<Vec<Chunk>, StoreError> {
        ops::chunk::list_chunks_by_file(&self.tx, file_id).await
    }

    pub async fn get_embedding(&self, chunk_id: i64) -> Result<Option<Embedding>, StoreError> {
        ops::embedding::get_embedding(&self.tx, chunk_id).await
    }

    pub async fn list_imports_by_file(&self, file_id: i64) -> Result<Vec<Import>, StoreError> {
        ops::import::list_imports_by_file(&self.tx, file_id).await
    }

    pub async fn get_status(&self, project_id: i64) -> Result<StoreStatus, StoreError> {
        ops::status::get_status(&self.tx, project_id).await
    }

    // ── Writes ────────────────────────────────────────────────────

    pub async fn create_project(
        &self,
        root_path: &str,
        module_name: &str,
        go_version: &str,
    ) -> Result<Project, StoreError> {
        ops::project::create_project(&self.tx, root_path, module_name, go_version).await
    }

    pub async fn update_project(
        &self,
        id: i64,
        module_name: &str,
        go_version: &str,
        total_files: i64,
        total_chunks: i64,
    ) -> Result<Project, StoreError> {
        ops::project::update_project(&self.tx, id, module_name, go_version, total_files, total_chunks)
            .await
    }

    pub async fn upsert_file(&self, file: &NewFile) -> Result<FileRecord, StoreError> {
        ops::file::upsert_file(&self.tx, file).await
    }

    pub async fn delete_file(&self, id: i64) -> Result<u64, StoreError> {
        ops::file::delete_file(&self.tx, id).await
    }

    pub async fn upsert_symbol(
        &self,
        file_id: i64,
        symbol: &NewSymbol,
    ) -> Result<Symbol, StoreError> {
        ops::symbol::upsert_symbol(&self.tx, file_id, symbol).await
    }

    pub async fn delete_symbols_by_file(&self, file_id: i64) -> Result<u64, StoreError> {
        ops::symbol::delete_symbols_by_file(&self.tx, file_id).await
    }

    pub async fn upsert_chunk(&self, file_id: i64, chunk: &NewChunk) -> Result<Chunk, StoreError> {
        ops::chunk::upsert_chunk(&self.tx, file_id, chunk).await
    }

    pub async fn delete_chunk(&self, id: i64) -> Result<u64, StoreError> {
        ops::chunk::delete_chunk(&self.tx, id).await
    }

    pub async fn delete_chunks_batch(&self, ids: &[i64]) -> Result<u64, StoreError> {
        ops::chunk::delete_chunks_batch(&self.tx, ids).await
    }

    pub async fn delete_chunks_by_file(&self, file_id: i64) -> Result<u64, StoreError> {
        ops::chunk::delete_chunks_by_file(&self.tx, file_id).await
    }

    pub async fn upsert_embedding(
        &self,
        chunk_id: i64,
        embedding: &NewEmbedding,
    ) -> Result<Embedding, StoreError> {
        ops::embedding::upsert_embedding(&self.tx, chunk_id, embedding).await
    }

    pub async fn delete_embedding(&self, chunk_id: i64) -> Result<u64, StoreError> {
        ops::embedding::delete_embedding(&self.tx, chunk_id).await
    }

    pub async fn upsert_import(
        &self,
        file_id: i64,
        import: &NewImport,
    ) -> Result<Import, StoreError> {
        ops::import::upsert_import(&self.tx, file_id, import).await
    }

    pub async fn delete_imports_by_file(&self, file_id: i64) -> Result<u64, StoreError> {
        ops::import::delete_imports_by_file(&self.tx, file_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ContextDb;
    use crate::ContextStore;
    use crate::test_support::{test_file, test_store};

    #[tokio::test]
    async fn rollback_discards_writes() {
        let store = test_store().await;
        let tx = store.begin_tx().await.unwrap();
        tx.create_project("/repo/rollback", "", "").await.unwrap();
        tx.rollback().await.unwrap();

        assert!(
            store
                .get_project_by_root("/repo/rollback")
                .await
                .unwrap()
                .is_none(),
            "rolled-back project must not exist"
        );
    }

    #[tokio::test]
    async fn commit_makes_writes_visible() {
        let store = test_store().await;
        let tx = store.begin_tx().await.unwrap();
        let project = tx.create_project("/repo/commit", "", "").await.unwrap();
        tx.upsert_file(&test_file(project.id, "a.go", "h")).await.unwrap();
        tx.commit().await.unwrap();

        let fetched = store
            .get_project_by_root("/repo/commit")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, project.id);
        assert_eq!(store.list_files(project.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tx_reads_see_own_uncommitted_writes() {
        let store = test_store().await;
        let tx = store.begin_tx().await.unwrap();
        let project = tx.create_project("/repo/own", "", "").await.unwrap();
        let seen = tx.get_project_by_root("/repo/own").await.unwrap();
        assert_eq!(seen.map(|p| p.id), Some(project.id));
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn uncommitted_writes_invisible_to_other_connections() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ctx.db");
        let writer = ContextStore::from_db(ContextDb::open_local(&path).await.unwrap());
        let reader = ContextStore::from_db(ContextDb::open_local(&path).await.unwrap());

        let tx = writer.begin_tx().await.unwrap();
        tx.create_project("/repo/iso", "", "").await.unwrap();

        assert!(
            reader
                .get_project_by_root("/repo/iso")
                .await
                .unwrap()
                .is_none(),
            "uncommitted write must be invisible outside the transaction"
        );

        tx.commit().await.unwrap();
        assert!(
            reader
                .get_project_by_root("/repo/iso")
                .await
                .unwrap()
                .is_some(),
            "committed write must be visible outside the transaction"
        );
    }

    #[tokio::test]
    async fn write_lane_serializes_transactions() {
        let store = std::sync::Arc::new(test_store().await);

        // A second begin_tx must wait for the first to finish, not error.
        let tx = store.begin_tx().await.unwrap();
        let other = std::sync::Arc::clone(&store);
        let pending = tokio::spawn(async move {
            let tx2 = other.begin_tx().await.unwrap();
            tx2.create_project("/repo/second", "", "").await.unwrap();
            tx2.commit().await.unwrap();
        });

        tx.create_project("/repo/first", "", "").await.unwrap();
        tx.commit().await.unwrap();
        pending.await.unwrap();

        assert!(store.get_project_by_root("/repo/first").await.unwrap().is_some());
        assert!(store.get_project_by_root("/repo/second").await.unwrap().is_some());
    }
}
