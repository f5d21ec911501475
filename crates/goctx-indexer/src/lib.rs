#![allow(clippy::cast_possible_truncation)]
//! # goctx-indexer
//!
//! The indexing side of gocontext: walk a Go repository, parse and chunk
//! each file, request embeddings, and persist everything through the store
//! — one transaction per file, bounded fan-out, content-hash skip for
//! unchanged files.

pub mod chunker;
pub mod error;
pub mod indexer;
pub mod walk;

pub use chunker::{Chunker, DraftChunk};
pub use error::IndexError;
pub use indexer::{FileFailure, IndexOptions, IndexReport, Indexer};
