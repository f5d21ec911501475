//! Symbol rows: natural-key upsert on (`file_id`, `name`, `start_line`,
//! `start_col`).

use goctx_core::entities::{DddFlags, NewSymbol, Symbol};

use crate::error::StoreError;
use crate::helpers::{parse_enum, parse_flag, parse_position};

const SYMBOL_COLUMNS: &str = "id, file_id, name, kind, package_name, signature, doc_comment, \
     scope, receiver, start_line, start_col, end_line, end_col, \
     is_aggregate_root, is_entity, is_value_object, is_repository, \
     is_service, is_command, is_query, is_handler";

fn row_to_symbol(row: &libsql::Row) -> Result<Symbol, StoreError> {
    Ok(Symbol {
        id: row.get::<i64>(0)?,
        file_id: row.get::<i64>(1)?,
        name: row.get::<String>(2)?,
        kind: parse_enum(&row.get::<String>(3)?)?,
        package_name: row.get::<String>(4)?,
        signature: row.get::<String>(5)?,
        doc_comment: row.get::<String>(6)?,
        scope: parse_enum(&row.get::<String>(7)?)?,
        receiver: row.get::<String>(8)?,
        start_line: parse_position(row.get::<i64>(9)?)?,
        start_col: parse_position(row.get::<i64>(10)?)?,
        end_line: parse_position(row.get::<i64>(11)?)?,
        end_col: parse_position(row.get::<i64>(12)?)?,
        ddd: DddFlags {
            is_aggregate_root: parse_flag(row.get::<i64>(13)?),
            is_entity: parse_flag(row.get::<i64>(14)?),
            is_value_object: parse_flag(row.get::<i64>(15)?),
            is_repository: parse_flag(row.get::<i64>(16)?),
            is_service: parse_flag(row.get::<i64>(17)?),
            is_command: parse_flag(row.get::<i64>(18)?),
            is_query: parse_flag(row.get::<i64>(19)?),
            is_handler: parse_flag(row.get::<i64>(20)?),
        },
    })
}

/// Insert or update a symbol row in one statement.
pub async fn upsert_symbol(
    conn: &libsql::Connection,
    file_id: i64,
    symbol: &NewSymbol,
) -> Result<Symbol, StoreError> {
    let sql = format!(
        "INSERT INTO symbols
            (file_id, name, kind, package_name, signature, doc_comment, scope, receiver,
             start_line, start_col, end_line, end_col,
             is_aggregate_root, is_entity, is_value_object, is_repository,
             is_service, is_command, is_query, is_handler)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                 ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
         ON CONFLICT (file_id, name, start_line, start_col) DO UPDATE SET
            kind = excluded.kind,
            package_name = excluded.package_name,
            signature = excluded.signature,
            doc_comment = excluded.doc_comment,
            scope = excluded.scope,
            receiver = excluded.receiver,
            end_line = excluded.end_line,
            end_col = excluded.end_col,
            is_aggregate_root = excluded.is_aggregate_root,
            is_entity = excluded.is_entity,
            is_value_object = excluded.is_value_object,
            is_repository = excluded.is_repository,
            is_service = excluded.is_service,
            is_command = excluded.is_command,
            is_query = excluded.is_query,
            is_handler = excluded.is_handler
         RETURNING {SYMBOL_COLUMNS}"
    );
    let mut rows = conn
        .query(
            &sql,
            libsql::params![
                file_id,
                symbol.name.as_str(),
                symbol.kind.as_str(),
                symbol.package_name.as_str(),
                symbol.signature.as_str(),
                symbol.doc_comment.as_str(),
                symbol.scope.as_str(),
                symbol.receiver.as_str(),
                i64::from(symbol.start_line),
                i64::from(symbol.start_col),
                i64::from(symbol.end_line),
                i64::from(symbol.end_col),
                i64::from(symbol.ddd.is_aggregate_root),
                i64::from(symbol.ddd.is_entity),
                i64::from(symbol.ddd.is_value_object),
                i64::from(symbol.ddd.is_repository),
                i64::from(symbol.ddd.is_service),
                i64::from(symbol.ddd.is_command),
                i64::from(symbol.ddd.is_query),
                i64::from(symbol.ddd.is_handler),
            ],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_symbol(&row),
        None => Err(StoreError::Query("symbol upsert returned no row".to_string())),
    }
}

pub async fn get_symbol(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<Symbol>, StoreError> {
    let sql = format!("SELECT {SYMBOL_COLUMNS} FROM symbols WHERE id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_symbol(&row)?)),
        None => Ok(None),
    }
}

pub async fn list_symbols_by_file(
    conn: &libsql::Connection,
    file_id: i64,
) -> Result<Vec<Symbol>, StoreError> {
    let sql = format!(
        "SELECT {SYMBOL_COLUMNS} FROM symbols WHERE file_id = ?1
         ORDER BY start_line, start_col"
    );
    let mut rows = conn.query(&sql, [file_id]).await?;
    let mut symbols = Vec::new();
    while let Some(row) = rows.next().await? {
        symbols.push(row_to_symbol(&row)?);
    }
    Ok(symbols)
}

pub async fn delete_symbols_by_file(
    conn: &libsql::Connection,
    file_id: i64,
) -> Result<u64, StoreError> {
    Ok(conn
        .execute("DELETE FROM symbols WHERE file_id = ?1", [file_id])
        .await?)
}
