//! Chunk rows: natural-key upsert on (`file_id`, `start_line`, `end_line`),
//! batched hydration for search results.

use goctx_core::entities::{Chunk, NewChunk};
use goctx_core::enums::SymbolKind;

use crate::error::StoreError;
use crate::helpers::{parse_datetime, parse_enum, parse_position};
use crate::store::{ChunkDetails, SymbolSummary};

const CHUNK_COLUMNS: &str = "id, file_id, symbol_id, content, content_hash, token_count, \
     start_line, end_line, context_before, context_after, chunk_type, created_at, updated_at";

fn row_to_chunk(row: &libsql::Row) -> Result<Chunk, StoreError> {
    Ok(Chunk {
        id: row.get::<i64>(0)?,
        file_id: row.get::<i64>(1)?,
        symbol_id: row.get::<Option<i64>>(2)?,
        content: row.get::<String>(3)?,
        content_hash: row.get::<String>(4)?,
        token_count: parse_position(row.get::<i64>(5)?.max(0))?,
        start_line: parse_position(row.get::<i64>(6)?)?,
        end_line: parse_position(row.get::<i64>(7)?)?,
        context_before: row.get::<String>(8)?,
        context_after: row.get::<String>(9)?,
        chunk_type: parse_enum(&row.get::<String>(10)?)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

/// Insert or update a chunk row in one statement.
pub async fn upsert_chunk(
    conn: &libsql::Connection,
    file_id: i64,
    chunk: &NewChunk,
) -> Result<Chunk, StoreError> {
    let sql = format!(
        "INSERT INTO chunks
            (file_id, symbol_id, content, content_hash, token_count,
             start_line, end_line, context_before, context_after, chunk_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT (file_id, start_line, end_line) DO UPDATE SET
            symbol_id = excluded.symbol_id,
            content = excluded.content,
            content_hash = excluded.content_hash,
            token_count = excluded.token_count,
            context_before = excluded.context_before,
            context_after = excluded.context_after,
            chunk_type = excluded.chunk_type,
            updated_at = datetime('now')
         RETURNING {CHUNK_COLUMNS}"
    );
    let mut rows = conn
        .query(
            &sql,
            libsql::params![
                file_id,
                chunk.symbol_id,
                chunk.content.as_str(),
                chunk.content_hash.as_str(),
                i64::from(chunk.token_count),
                i64::from(chunk.start_line),
                i64::from(chunk.end_line),
                chunk.context_before.as_str(),
                chunk.context_after.as_str(),
                chunk.chunk_type.as_str(),
            ],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_chunk(&row),
        None => Err(StoreError::Query("chunk upsert returned no row".to_string())),
    }
}

pub async fn get_chunk(conn: &libsql::Connection, id: i64) -> Result<Option<Chunk>, StoreError> {
    let sql = format!("SELECT {CHUNK_COLUMNS} FROM chunks WHERE id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_chunk(&row)?)),
        None => Ok(None),
    }
}

pub async fn list_chunks_by_file(
    conn: &libsql::Connection,
    file_id: i64,
) -> Result<Vec<Chunk>, StoreError> {
    let sql = format!(
        "SELECT {CHUNK_COLUMNS} FROM chunks WHERE file_id = ?1 ORDER BY start_line"
    );
    let mut rows = conn.query(&sql, [file_id]).await?;
    let mut chunks = Vec::new();
    while let Some(row) = rows.next().await? {
        chunks.push(row_to_chunk(&row)?);
    }
    Ok(chunks)
}

/// Delete one chunk; its embedding cascades, triggers purge the FTS row.
pub async fn delete_chunk(conn: &libsql::Connection, id: i64) -> Result<u64, StoreError> {
    Ok(conn.execute("DELETE FROM chunks WHERE id = ?1", [id]).await?)
}

/// Delete a batch of chunks by id in one statement.
pub async fn delete_chunks_batch(
    conn: &libsql::Connection,
    ids: &[i64],
) -> Result<u64, StoreError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("DELETE FROM chunks WHERE id IN ({placeholders})");
    let params: Vec<libsql::Value> = ids.iter().map(|id| libsql::Value::from(*id)).collect();
    Ok(conn.execute(&sql, params).await?)
}

pub async fn delete_chunks_by_file(
    conn: &libsql::Connection,
    file_id: i64,
) -> Result<u64, StoreError> {
    Ok(conn
        .execute("DELETE FROM chunks WHERE file_id = ?1", [file_id])
        .await?)
}

/// Hydrate chunk rows with file and symbol metadata for a result set, one
/// round trip per set (batched `IN`). Output order follows `ids`.
pub async fn hydrate_chunks(
    conn: &libsql::Connection,
    ids: &[i64],
) -> Result<Vec<ChunkDetails>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT c.id, c.file_id, c.symbol_id, c.content, c.content_hash, c.token_count,
                c.start_line, c.end_line, c.context_before, c.context_after, c.chunk_type,
                c.created_at, c.updated_at,
                f.file_path, f.package_name,
                s.name, s.kind, s.package_name, s.signature
         FROM chunks c
         JOIN files f ON f.id = c.file_id
         LEFT JOIN symbols s ON s.id = c.symbol_id
         WHERE c.id IN ({placeholders})"
    );
    let params: Vec<libsql::Value> = ids.iter().map(|id| libsql::Value::from(*id)).collect();
    let mut rows = conn.query(&sql, params).await?;

    let mut by_id = std::collections::HashMap::new();
    while let Some(row) = rows.next().await? {
        let chunk = row_to_chunk(&row)?;
        let file_path = row.get::<String>(13)?;
        let file_package = row.get::<String>(14)?;
        let symbol = match row.get::<Option<String>>(15)? {
            Some(name) => Some(SymbolSummary {
                name,
                kind: parse_enum::<SymbolKind>(&row.get::<String>(16)?)?,
                package_name: row.get::<String>(17)?,
                signature: row.get::<String>(18)?,
            }),
            None => None,
        };
        by_id.insert(
            chunk.id,
            ChunkDetails {
                chunk,
                file_path,
                file_package,
                symbol,
            },
        );
    }

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}
