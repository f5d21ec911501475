//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent
//! re-running. A database stamped with a version newer than
//! [`SCHEMA_VERSION`] refuses to open.

use crate::ContextDb;
use crate::error::StoreError;

/// Highest schema version this binary understands.
pub const SCHEMA_VERSION: i64 = 1;

/// Initial schema: 6 tables, 2 FTS5 virtual tables, indexes, triggers.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl ContextDb {
    /// Run all pending migrations.
    pub(crate) async fn run_migrations(&self) -> Result<(), StoreError> {
        if let Some(found) = self.stored_schema_version().await? {
            if found > SCHEMA_VERSION {
                return Err(StoreError::SchemaTooNew {
                    found,
                    supported: SCHEMA_VERSION,
                });
            }
            if found == SCHEMA_VERSION {
                return Ok(());
            }
        }

        self.conn()
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_initial: {e}")))?;
        self.conn()
            .execute(
                "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .await
            .map_err(|e| StoreError::Migration(format!("stamping version: {e}")))?;
        Ok(())
    }

    /// Max stamped version, or `None` for a fresh database.
    async fn stored_schema_version(&self) -> Result<Option<i64>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
                (),
            )
            .await?;
        if rows.next().await?.is_none() {
            return Ok(None);
        }

        let mut rows = self
            .conn()
            .query("SELECT MAX(version) FROM schema_version", ())
            .await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<Option<i64>>(0)?),
            None => Ok(None),
        }
    }
}
