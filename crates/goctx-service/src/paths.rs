//! Per-project database path resolution.
//!
//! Each indexed repository gets its own single-file store at
//! `~/.gocontext/<project_hash>.db`, where the hash is the first 16 hex
//! characters of SHA-256 over the canonical root path. A configured
//! `[store] path` overrides the whole scheme.

use std::path::{Path, PathBuf};

use goctx_core::hash::content_hash;

/// Stable short hash of a project root.
#[must_use]
pub fn project_hash(root: &Path) -> String {
    let canonical = root
        .canonicalize()
        .unwrap_or_else(|_| root.to_path_buf());
    content_hash(&canonical.display().to_string())[..16].to_string()
}

/// Default database path for a project root.
#[must_use]
pub fn project_db_path(root: &Path) -> PathBuf {
    let base = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gocontext");
    base.join(format!("{}.db", project_hash(root)))
}
