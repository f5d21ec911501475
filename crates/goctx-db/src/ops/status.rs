//! Per-project row counts and index health.

use crate::error::StoreError;
use crate::store::StoreStatus;

async fn count(
    conn: &libsql::Connection,
    sql: &str,
    project_id: i64,
) -> Result<i64, StoreError> {
    let mut rows = conn.query(sql, [project_id]).await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}

pub async fn get_status(
    conn: &libsql::Connection,
    project_id: i64,
) -> Result<StoreStatus, StoreError> {
    let files = count(
        conn,
        "SELECT COUNT(*) FROM files WHERE project_id = ?1",
        project_id,
    )
    .await?;
    let symbols = count(
        conn,
        "SELECT COUNT(*) FROM symbols s JOIN files f ON f.id = s.file_id
         WHERE f.project_id = ?1",
        project_id,
    )
    .await?;
    let chunks = count(
        conn,
        "SELECT COUNT(*) FROM chunks c JOIN files f ON f.id = c.file_id
         WHERE f.project_id = ?1",
        project_id,
    )
    .await?;
    let embeddings = count(
        conn,
        "SELECT COUNT(*) FROM embeddings e
         JOIN chunks c ON c.id = e.chunk_id
         JOIN files f ON f.id = c.file_id
         WHERE f.project_id = ?1",
        project_id,
    )
    .await?;

    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('chunks_fts', 'symbols_fts')",
            (),
        )
        .await?;
    let fts_tables = match rows.next().await? {
        Some(row) => row.get::<i64>(0)?,
        None => 0,
    };

    Ok(StoreStatus {
        files,
        symbols,
        chunks,
        embeddings,
        fts_indexes_built: fts_tables == 2,
    })
}
