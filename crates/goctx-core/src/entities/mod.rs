//! Entity structs for the gocontext data model.
//!
//! Each entity maps to a table in the libSQL database. The model is a strict
//! ownership tree: Project ⇒ File ⇒ {Symbol, Chunk, Import}; Chunk ⇒
//! Embedding. Non-owning references are integer row ids.
//!
//! `New*` structs are the insert/upsert payloads produced by the pipeline
//! before row ids exist; the bare structs are full stored rows.

mod chunk;
mod embedding;
mod file;
mod import;
mod project;
mod symbol;

pub use chunk::{Chunk, NewChunk};
pub use embedding::{Embedding, NewEmbedding};
pub use file::{FileRecord, NewFile};
pub use import::{Import, NewImport};
pub use project::Project;
pub use symbol::{DddFlags, NewSymbol, Symbol};
