//! Go repository path conventions used by the file walker.

/// Returns `true` for Go test files (`*_test.go`).
#[must_use]
pub fn is_test_file(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with("_test.go")
}

/// Returns `true` for directories the walker treats as vendored code.
#[must_use]
pub fn is_vendor_dir(dir_name: &str) -> bool {
    dir_name == "vendor"
}

/// Returns `true` for directories that never hold indexable Go source.
#[must_use]
pub fn is_skipped_dir(dir_name: &str) -> bool {
    dir_name == "testdata" || dir_name.starts_with('.')
}

/// Returns `true` for files the indexer considers Go source.
#[must_use]
pub fn is_go_file(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == "go")
}
