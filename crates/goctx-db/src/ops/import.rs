//! Import rows. Imports have no natural key; the indexer replaces them
//! wholesale per file (delete-then-insert inside the file transaction).

use goctx_core::entities::{Import, NewImport};

use crate::error::StoreError;

pub async fn upsert_import(
    conn: &libsql::Connection,
    file_id: i64,
    import: &NewImport,
) -> Result<Import, StoreError> {
    let mut rows = conn
        .query(
            "INSERT INTO imports (file_id, import_path, alias)
             VALUES (?1, ?2, ?3)
             RETURNING id, file_id, import_path, alias",
            libsql::params![file_id, import.import_path.as_str(), import.alias.as_str()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Import {
            id: row.get::<i64>(0)?,
            file_id: row.get::<i64>(1)?,
            import_path: row.get::<String>(2)?,
            alias: row.get::<String>(3)?,
        }),
        None => Err(StoreError::Query("import insert returned no row".to_string())),
    }
}

pub async fn list_imports_by_file(
    conn: &libsql::Connection,
    file_id: i64,
) -> Result<Vec<Import>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, file_id, import_path, alias FROM imports
             WHERE file_id = ?1 ORDER BY import_path",
            [file_id],
        )
        .await?;
    let mut imports = Vec::new();
    while let Some(row) = rows.next().await? {
        imports.push(Import {
            id: row.get::<i64>(0)?,
            file_id: row.get::<i64>(1)?,
            import_path: row.get::<String>(2)?,
            alias: row.get::<String>(3)?,
        });
    }
    Ok(imports)
}

pub async fn delete_imports_by_file(
    conn: &libsql::Connection,
    file_id: i64,
) -> Result<u64, StoreError> {
    Ok(conn
        .execute("DELETE FROM imports WHERE file_id = ?1", [file_id])
        .await?)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{test_file, test_store};
    use goctx_core::entities::NewImport;

    #[tokio::test]
    async fn replace_wholesale() {
        let store = test_store().await;
        let project = store.create_project("/repo", "", "").await.unwrap();
        let file = store
            .upsert_file(&test_file(project.id, "a.go", "h"))
            .await
            .unwrap();

        for (path, alias) in [("fmt", ""), ("strings", "str")] {
            store
                .upsert_import(
                    file.id,
                    &NewImport {
                        import_path: path.to_string(),
                        alias: alias.to_string(),
                    },
                )
                .await
                .unwrap();
        }
        assert_eq!(store.list_imports_by_file(file.id).await.unwrap().len(), 2);

        store.delete_imports_by_file(file.id).await.unwrap();
        store
            .upsert_import(
                file.id,
                &NewImport {
                    import_path: "context".to_string(),
                    alias: String::new(),
                },
            )
            .await
            .unwrap();

        let imports = store.list_imports_by_file(file.id).await.unwrap();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].import_path, "context");
    }
}
