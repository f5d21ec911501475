//! Gitignore-aware Go source walker.
//!
//! Uses the `ignore` crate: `.gitignore` is respected, hidden and
//! never-indexable directories (`testdata`, dotted dirs) are always
//! skipped, and `vendor/` plus `*_test.go` files are gated by the index
//! request flags.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tokio_util::sync::CancellationToken;

use crate::error::IndexError;
use goctx_parser::test_files::{is_go_file, is_skipped_dir, is_test_file, is_vendor_dir};

/// Collect the Go files under `root`, as paths relative to it, sorted.
///
/// # Errors
///
/// Returns [`IndexError::Cancelled`] when `cancel` fires mid-walk and
/// [`IndexError::Walk`] for unreadable directory entries.
pub fn collect_go_files(
    root: &Path,
    include_tests: bool,
    include_vendor: bool,
    cancel: &CancellationToken,
) -> Result<Vec<PathBuf>, IndexError> {
    let mut builder = WalkBuilder::new(root);
    builder.hidden(false).filter_entry(move |entry| {
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            if is_skipped_dir(&name) {
                return false;
            }
            if !include_vendor && is_vendor_dir(&name) {
                return false;
            }
            return true;
        }
        if !include_tests && is_test_file(&name) {
            return false;
        }
        true
    });

    let mut files = Vec::new();
    for entry in builder.build() {
        // Checked at the loop head so cancelling a walk over a large tree
        // is promptly observed.
        if cancel.is_cancelled() {
            return Err(IndexError::Cancelled);
        }
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !is_go_file(&name) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        write(root, "main.go", "package main\n");
        write(root, "pkg/user.go", "package pkg\n");
        write(root, "pkg/user_test.go", "package pkg\n");
        write(root, "vendor/dep/dep.go", "package dep\n");
        write(root, "testdata/fixture.go", "package fixture\n");
        write(root, ".hidden/skip.go", "package skip\n");
        write(root, "README.md", "# readme\n");
        dir
    }

    #[test]
    fn collects_go_files_relative_and_sorted() {
        let dir = fixture();
        let files = collect_go_files(dir.path(), true, false, &CancellationToken::new()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("main.go"),
                PathBuf::from("pkg/user.go"),
                PathBuf::from("pkg/user_test.go"),
            ]
        );
    }

    #[test]
    fn excludes_tests_when_flagged() {
        let dir = fixture();
        let files = collect_go_files(dir.path(), false, false, &CancellationToken::new()).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("main.go"), PathBuf::from("pkg/user.go")]
        );
    }

    #[test]
    fn includes_vendor_when_flagged() {
        let dir = fixture();
        let files = collect_go_files(dir.path(), false, true, &CancellationToken::new()).unwrap();
        assert!(files.contains(&PathBuf::from("vendor/dep/dep.go")));
    }

    #[test]
    fn cancelled_walk_stops_early() {
        let dir = fixture();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = collect_go_files(dir.path(), true, false, &cancel);
        assert!(matches!(result, Err(IndexError::Cancelled)));
    }

    #[test]
    fn gitignore_is_respected() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        write(root, ".gitignore", "generated/\n");
        write(root, "kept.go", "package kept\n");
        write(root, "generated/gen.go", "package gen\n");
        // ignore's gitignore handling activates inside git repositories.
        std::fs::create_dir_all(root.join(".git")).unwrap();

        let files = collect_go_files(root, true, false, &CancellationToken::new()).unwrap();
        assert_eq!(files, vec![PathBuf::from("kept.go")]);
    }
}
