#![allow(clippy::cast_possible_truncation)]
//! # goctx-parser
//!
//! ast-grep-based Go source parsing for gocontext.
//!
//! Produces a [`ParseResult`] per file: package name, imports, extracted
//! symbols (functions, methods, types, consts, vars, struct fields) with
//! 1-based spans, and captured syntax errors. A malformed source never fails
//! the parse — partial symbols are returned with `errors` populated; only
//! failing to read the file is an error.
//!
//! Type symbols are classified into DDD roles by name pattern (see [`ddd`]).

pub mod ddd;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod test_files;
pub mod types;

pub use error::ParserError;
pub use parser::{parse_file, parse_go_source};
pub use types::{ParseResult, SyntaxError};
