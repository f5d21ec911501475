//! # goctx-db
//!
//! libSQL persistence for gocontext.
//!
//! A single database file holds one or more indexed projects: files,
//! symbols, chunks, embeddings, imports, plus two FTS5 indexes maintained by
//! triggers. One connection, WAL journaling; writers serialize behind a
//! write-lane mutex, readers never block each other.
//!
//! Uses the `libsql` crate (C SQLite fork) — native FTS5 and a stable async
//! API.

pub mod db;
pub mod error;
pub mod fts;
pub mod helpers;
pub mod migrations;
pub mod ops;
pub mod retry;
pub mod search;
pub mod store;
pub mod tx;
pub mod vector;

pub use db::ContextDb;
pub use error::StoreError;
pub use search::{ScoredChunk, SearchFilters};
pub use store::{ChunkDetails, ContextStore, StoreStatus, SymbolSummary};
pub use tx::StoreTx;

#[cfg(test)]
pub(crate) mod test_support;
