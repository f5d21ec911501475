//! Database handle: open, pragmas, connection access.

use std::path::Path;

use tokio::sync::Mutex;

use crate::error::StoreError;

/// An open gocontext database.
///
/// Holds exactly one connection. SQLite with the FTS5 extension wants a
/// single writer; all write paths go through [`crate::ContextStore`], which
/// serializes them on `write_lane`.
#[derive(Debug)]
pub struct ContextDb {
    conn: libsql::Connection,
    /// Writers (including transactions) hold this for their duration.
    pub(crate) write_lane: Mutex<()>,
}

impl ContextDb {
    /// Open (creating if absent) a local database file and run migrations.
    ///
    /// Pass `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the file cannot be opened, a pragma fails,
    /// the schema is newer than this binary supports, or a migration fails.
    pub async fn open_local(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(path.as_ref()).build().await?;
        let conn = db.connect()?;

        // WAL lets readers proceed while the single writer commits.
        conn.query("PRAGMA journal_mode = WAL", ()).await?;
        conn.execute("PRAGMA foreign_keys = ON", ()).await?;
        conn.query("PRAGMA busy_timeout = 5000", ()).await?;

        let handle = Self {
            conn,
            write_lane: Mutex::new(()),
        };
        handle.run_migrations().await?;
        Ok(handle)
    }

    /// The shared connection.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_in_memory() {
        let db = ContextDb::open_local(":memory:").await.unwrap();
        let mut rows = db.conn().query("SELECT 1 + 1", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 2);
    }

    #[tokio::test]
    async fn open_file_backed_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ctx.db");
        {
            let db = ContextDb::open_local(&path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO projects (root_path) VALUES ('/tmp/demo')",
                    (),
                )
                .await
                .unwrap();
        }
        {
            let db = ContextDb::open_local(&path).await.unwrap();
            let mut rows = db
                .conn()
                .query("SELECT COUNT(*) FROM projects", ())
                .await
                .unwrap();
            let row = rows.next().await.unwrap().unwrap();
            assert_eq!(row.get::<i64>(0).unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = ContextDb::open_local(":memory:").await.unwrap();
        let result = db
            .conn()
            .execute(
                "INSERT INTO files (project_id, file_path, content_hash, mod_time)
                 VALUES (999, 'a.go', 'h', datetime('now'))",
                (),
            )
            .await;
        assert!(result.is_err(), "orphan file insert should fail");
    }
}
