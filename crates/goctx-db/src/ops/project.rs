//! Project rows: create, lookup, reindex bookkeeping.

use goctx_core::entities::Project;

use crate::error::StoreError;
use crate::helpers::{parse_datetime, parse_optional_datetime};

fn row_to_project(row: &libsql::Row) -> Result<Project, StoreError> {
    let last_indexed = row.get::<Option<String>>(7)?;
    Ok(Project {
        id: row.get::<i64>(0)?,
        root_path: row.get::<String>(1)?,
        module_name: row.get::<String>(2)?,
        go_version: row.get::<String>(3)?,
        total_files: row.get::<i64>(4)?,
        total_chunks: row.get::<i64>(5)?,
        index_version: row.get::<i64>(6)?,
        last_indexed_at: parse_optional_datetime(last_indexed.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

const PROJECT_COLUMNS: &str = "id, root_path, module_name, go_version, total_files, \
     total_chunks, index_version, last_indexed_at, created_at, updated_at";

/// Create a project for `root_path`.
///
/// # Errors
///
/// Returns [`StoreError::AlreadyExists`] when the root is already indexed.
pub async fn create_project(
    conn: &libsql::Connection,
    root_path: &str,
    module_name: &str,
    go_version: &str,
) -> Result<Project, StoreError> {
    let sql = format!(
        "INSERT INTO projects (root_path, module_name, go_version)
         VALUES (?1, ?2, ?3)
         RETURNING {PROJECT_COLUMNS}"
    );
    let result = conn
        .query(&sql, libsql::params![root_path, module_name, go_version])
        .await;
    let mut rows = match result {
        Ok(rows) => rows,
        Err(e) => {
            let store_err = StoreError::from(e);
            if store_err.is_unique_violation() {
                return Err(StoreError::AlreadyExists {
                    entity: "project",
                    key: root_path.to_string(),
                });
            }
            return Err(store_err);
        }
    };
    match rows.next().await? {
        Some(row) => row_to_project(&row),
        None => Err(StoreError::Query("project insert returned no row".to_string())),
    }
}

pub async fn get_project_by_root(
    conn: &libsql::Connection,
    root_path: &str,
) -> Result<Option<Project>, StoreError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE root_path = ?1");
    let mut rows = conn.query(&sql, [root_path]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_project(&row)?)),
        None => Ok(None),
    }
}

pub async fn get_project_by_id(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<Project>, StoreError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_project(&row)?)),
        None => Ok(None),
    }
}

/// Refresh counts and `last_indexed_at` after a completed index run.
pub async fn update_project(
    conn: &libsql::Connection,
    id: i64,
    module_name: &str,
    go_version: &str,
    total_files: i64,
    total_chunks: i64,
) -> Result<Project, StoreError> {
    let sql = format!(
        "UPDATE projects SET
            module_name = ?2,
            go_version = ?3,
            total_files = ?4,
            total_chunks = ?5,
            last_indexed_at = datetime('now'),
            updated_at = datetime('now')
         WHERE id = ?1
         RETURNING {PROJECT_COLUMNS}"
    );
    let mut rows = conn
        .query(
            &sql,
            libsql::params![id, module_name, go_version, total_files, total_chunks],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_project(&row),
        None => Err(StoreError::NotFound {
            entity: "project",
            key: id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_store;

    #[tokio::test]
    async fn create_and_get_by_root() {
        let store = test_store().await;
        let project = store
            .create_project("/repo/shop", "example.com/shop", "1.22")
            .await
            .unwrap();
        assert!(project.id > 0);
        assert_eq!(project.index_version, 1);
        assert!(project.last_indexed_at.is_none());

        let fetched = store.get_project_by_root("/repo/shop").await.unwrap().unwrap();
        assert_eq!(fetched.id, project.id);
        assert_eq!(fetched.module_name, "example.com/shop");
    }

    #[tokio::test]
    async fn duplicate_root_is_already_exists() {
        let store = test_store().await;
        store.create_project("/repo/a", "", "").await.unwrap();
        let err = store.create_project("/repo/a", "", "").await.unwrap_err();
        assert!(matches!(
            err,
            crate::StoreError::AlreadyExists { entity: "project", .. }
        ));
    }

    #[tokio::test]
    async fn missing_root_is_none() {
        let store = test_store().await;
        assert!(store.get_project_by_root("/nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_refreshes_counts_and_timestamp() {
        let store = test_store().await;
        let project = store.create_project("/repo/b", "", "").await.unwrap();
        let updated = store
            .update_project(project.id, "example.com/b", "1.22", 12, 340)
            .await
            .unwrap();
        assert_eq!(updated.total_files, 12);
        assert_eq!(updated.total_chunks, 340);
        assert!(updated.last_indexed_at.is_some());
    }

    #[tokio::test]
    async fn update_missing_project_is_not_found() {
        let store = test_store().await;
        let err = store.update_project(42, "", "", 0, 0).await.unwrap_err();
        assert!(matches!(err, crate::StoreError::NotFound { .. }));
    }
}
