//! File rows: natural-key upsert on (`project_id`, `file_path`), cascade
//! delete.

use goctx_core::entities::{FileRecord, NewFile};

use crate::error::StoreError;
use crate::helpers::{parse_datetime, parse_optional_datetime};

const FILE_COLUMNS: &str = "id, project_id, file_path, package_name, content_hash, \
     mod_time, size_bytes, parse_error, last_indexed_at";

fn row_to_file(row: &libsql::Row) -> Result<FileRecord, StoreError> {
    let last_indexed = row.get::<Option<String>>(8)?;
    Ok(FileRecord {
        id: row.get::<i64>(0)?,
        project_id: row.get::<i64>(1)?,
        file_path: row.get::<String>(2)?,
        package_name: row.get::<String>(3)?,
        content_hash: row.get::<String>(4)?,
        mod_time: parse_datetime(&row.get::<String>(5)?)?,
        size_bytes: row.get::<i64>(6)?,
        parse_error: row.get::<Option<String>>(7)?,
        last_indexed_at: parse_optional_datetime(last_indexed.as_deref())?,
    })
}

/// Insert or update a file row in one statement.
pub async fn upsert_file(
    conn: &libsql::Connection,
    file: &NewFile,
) -> Result<FileRecord, StoreError> {
    let sql = format!(
        "INSERT INTO files
            (project_id, file_path, package_name, content_hash, mod_time, size_bytes,
             parse_error, last_indexed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, datetime('now'))
         ON CONFLICT (project_id, file_path) DO UPDATE SET
            package_name = excluded.package_name,
            content_hash = excluded.content_hash,
            mod_time = excluded.mod_time,
            size_bytes = excluded.size_bytes,
            parse_error = excluded.parse_error,
            last_indexed_at = datetime('now')
         RETURNING {FILE_COLUMNS}"
    );
    let mut rows = conn
        .query(
            &sql,
            libsql::params![
                file.project_id,
                file.file_path.as_str(),
                file.package_name.as_str(),
                file.content_hash.as_str(),
                file.mod_time.to_rfc3339(),
                file.size_bytes,
                file.parse_error.as_deref(),
            ],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_file(&row),
        None => Err(StoreError::Query("file upsert returned no row".to_string())),
    }
}

pub async fn get_file(
    conn: &libsql::Connection,
    project_id: i64,
    file_path: &str,
) -> Result<Option<FileRecord>, StoreError> {
    let sql = format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE project_id = ?1 AND file_path = ?2"
    );
    let mut rows = conn
        .query(&sql, libsql::params![project_id, file_path])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_file(&row)?)),
        None => Ok(None),
    }
}

pub async fn get_file_by_id(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<FileRecord>, StoreError> {
    let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_file(&row)?)),
        None => Ok(None),
    }
}

pub async fn list_files(
    conn: &libsql::Connection,
    project_id: i64,
) -> Result<Vec<FileRecord>, StoreError> {
    let sql = format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE project_id = ?1 ORDER BY file_path"
    );
    let mut rows = conn.query(&sql, [project_id]).await?;
    let mut files = Vec::new();
    while let Some(row) = rows.next().await? {
        files.push(row_to_file(&row)?);
    }
    Ok(files)
}

/// Delete a file row; symbols, chunks, imports (and through chunks,
/// embeddings) cascade, and triggers purge the FTS rows.
pub async fn delete_file(conn: &libsql::Connection, id: i64) -> Result<u64, StoreError> {
    Ok(conn.execute("DELETE FROM files WHERE id = ?1", [id]).await?)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{test_file, test_store};

    #[tokio::test]
    async fn upsert_inserts_then_updates_in_place() {
        let store = test_store().await;
        let project = store.create_project("/repo", "", "").await.unwrap();

        let first = store
            .upsert_file(&test_file(project.id, "pkg/a.go", "hash-1"))
            .await
            .unwrap();
        let second = store
            .upsert_file(&test_file(project.id, "pkg/a.go", "hash-2"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id, "natural-key upsert must not duplicate");
        assert_eq!(second.content_hash, "hash-2");
        assert_eq!(store.list_files(project.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn repeated_upsert_is_idempotent() {
        let store = test_store().await;
        let project = store.create_project("/repo", "", "").await.unwrap();
        let file = test_file(project.id, "pkg/a.go", "hash");
        for _ in 0..5 {
            store.upsert_file(&file).await.unwrap();
        }
        let files = store.list_files(project.id).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content_hash, "hash");
    }

    #[tokio::test]
    async fn get_by_path_and_id() {
        let store = test_store().await;
        let project = store.create_project("/repo", "", "").await.unwrap();
        let stored = store
            .upsert_file(&test_file(project.id, "cmd/main.go", "h"))
            .await
            .unwrap();

        let by_path = store
            .get_file(project.id, "cmd/main.go")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_path.id, stored.id);

        let by_id = store.get_file_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(by_id.file_path, "cmd/main.go");

        assert!(store.get_file(project.id, "nope.go").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_ordered_by_path() {
        let store = test_store().await;
        let project = store.create_project("/repo", "", "").await.unwrap();
        for path in ["z.go", "a.go", "m.go"] {
            store
                .upsert_file(&test_file(project.id, path, "h"))
                .await
                .unwrap();
        }
        let paths: Vec<_> = store
            .list_files(project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.file_path)
            .collect();
        assert_eq!(paths, vec!["a.go", "m.go", "z.go"]);
    }
}
