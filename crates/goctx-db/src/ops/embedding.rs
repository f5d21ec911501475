//! Embedding rows: natural-key upsert on (`chunk_id`), blob codec at the
//! boundary.

use goctx_core::entities::{Embedding, NewEmbedding};

use crate::error::StoreError;
use crate::helpers::{parse_datetime, parse_position};
use crate::vector::{decode_vector, encode_vector};

fn row_to_embedding(row: &libsql::Row) -> Result<Embedding, StoreError> {
    let blob = row.get::<Vec<u8>>(2)?;
    let dimension = parse_position(row.get::<i64>(3)?)?;
    let vector = decode_vector(&blob, dimension as usize).ok_or_else(|| {
        StoreError::Query(format!(
            "embedding blob length {} does not match dimension {dimension}",
            blob.len()
        ))
    })?;
    Ok(Embedding {
        id: row.get::<i64>(0)?,
        chunk_id: row.get::<i64>(1)?,
        vector,
        dimension,
        provider: row.get::<String>(4)?,
        model: row.get::<String>(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// Insert or replace the embedding for a chunk in one statement.
///
/// Recomputing with a different model updates in place; the chunk row is
/// untouched.
pub async fn upsert_embedding(
    conn: &libsql::Connection,
    chunk_id: i64,
    embedding: &NewEmbedding,
) -> Result<Embedding, StoreError> {
    let blob = encode_vector(&embedding.vector);
    let dimension = i64::try_from(embedding.vector.len())
        .map_err(|_| StoreError::Query("vector too large".to_string()))?;
    let mut rows = conn
        .query(
            "INSERT INTO embeddings (chunk_id, vector, dimension, provider, model)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (chunk_id) DO UPDATE SET
                vector = excluded.vector,
                dimension = excluded.dimension,
                provider = excluded.provider,
                model = excluded.model,
                created_at = datetime('now')
             RETURNING id, chunk_id, vector, dimension, provider, model, created_at",
            libsql::params![
                chunk_id,
                blob,
                dimension,
                embedding.provider.as_str(),
                embedding.model.as_str(),
            ],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_embedding(&row),
        None => Err(StoreError::Query(
            "embedding upsert returned no row".to_string(),
        )),
    }
}

pub async fn get_embedding(
    conn: &libsql::Connection,
    chunk_id: i64,
) -> Result<Option<Embedding>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id, chunk_id, vector, dimension, provider, model, created_at
             FROM embeddings WHERE chunk_id = ?1",
            [chunk_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_embedding(&row)?)),
        None => Ok(None),
    }
}

pub async fn delete_embedding(
    conn: &libsql::Connection,
    chunk_id: i64,
) -> Result<u64, StoreError> {
    Ok(conn
        .execute("DELETE FROM embeddings WHERE chunk_id = ?1", [chunk_id])
        .await?)
}
