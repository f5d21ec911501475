//! SQL operation implementations.
//!
//! Every function takes a `&libsql::Connection`, so the same code backs
//! both [`crate::ContextStore`] (auto-commit lane) and [`crate::StoreTx`]
//! (scoped transaction) — `libsql::Transaction` derefs to `Connection`.
//!
//! All upserts are single-statement `INSERT ... ON CONFLICT ... DO UPDATE
//! ... RETURNING`. Check-then-insert loses the race under concurrent
//! writers.

pub mod chunk;
pub mod embedding;
pub mod file;
pub mod import;
pub mod project;
pub mod search;
pub mod status;
pub mod symbol;
