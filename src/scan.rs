//! Source tree enumeration.
//!
//! The first step of the read phase: walk the source directory recursively
//! and produce the list of regular files to load, excluding anything matched
//! by the configured ignore patterns.
//!
//! ## Ignore Patterns
//!
//! Patterns are globs (`*.tmp`, `drafts/**`, `.DS_Store`). A directory entry
//! is excluded when any pattern matches either its file name or its path
//! relative to the walk root. Matching a directory prunes the entire
//! subtree, so files under an ignored directory are never visited.
//!
//! ## Ordering
//!
//! Entries are visited in file-name order, so the returned listing is
//! deterministic for a given filesystem snapshot. The pipeline does not
//! depend on this order — documents are keyed by relative path — but tests
//! and humans appreciate stable output.

use glob::Pattern;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read the directory at: {path}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("invalid ignore pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// List every regular file under `root`, excluding ignored paths.
///
/// Returns absolute paths (or paths rooted however `root` is rooted), in
/// deterministic file-name order. Fails if `root` does not exist or a
/// directory inside it cannot be read.
pub fn enumerate(root: &Path, ignores: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    let patterns = ignores
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.path() == root || !is_ignored(entry.path(), root, &patterns));

    for entry in walker {
        let entry = entry.map_err(|err| ScanError::DirectoryAccess {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: err,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Whether any pattern matches the entry's file name or root-relative path.
fn is_ignored(path: &Path, root: &Path, patterns: &[Pattern]) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy());
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();

    patterns.iter().any(|pattern| {
        name.as_deref().is_some_and(|n| pattern.matches(n)) || pattern.matches(&rel)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn rel_listing(root: &Path, ignores: &[&str]) -> Vec<String> {
        let ignores: Vec<String> = ignores.iter().map(|s| s.to_string()).collect();
        enumerate(root, &ignores)
            .unwrap()
            .into_iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn finds_nested_files_in_name_order() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b.txt"));
        touch(&tmp.path().join("a.txt"));
        touch(&tmp.path().join("posts/one.md"));
        touch(&tmp.path().join("posts/deep/two.md"));

        let listing = rel_listing(tmp.path(), &[]);
        assert_eq!(
            listing,
            ["a.txt", "b.txt", "posts/deep/two.md", "posts/one.md"]
        );
    }

    #[test]
    fn returns_only_regular_files() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.txt"));
        fs::create_dir_all(tmp.path().join("empty-dir")).unwrap();

        assert_eq!(rel_listing(tmp.path(), &[]), ["a.txt"]);
    }

    #[test]
    fn ignores_by_file_name() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("keep.md"));
        touch(&tmp.path().join("scratch.tmp"));
        touch(&tmp.path().join("posts/also.tmp"));

        assert_eq!(rel_listing(tmp.path(), &["*.tmp"]), ["keep.md"]);
    }

    #[test]
    fn ignores_by_relative_path() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("keep.md"));
        touch(&tmp.path().join("posts/drafts/wip.md"));

        assert_eq!(rel_listing(tmp.path(), &["posts/drafts/*"]), ["keep.md"]);
    }

    #[test]
    fn ignored_directory_prunes_subtree() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("keep.md"));
        touch(&tmp.path().join("drafts/a.md"));
        touch(&tmp.path().join("drafts/deep/b.md"));

        assert_eq!(rel_listing(tmp.path(), &["drafts"]), ["keep.md"]);
    }

    #[test]
    fn missing_root_is_directory_access_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let result = enumerate(&missing, &[]);
        assert!(matches!(
            result,
            Err(ScanError::DirectoryAccess { path, .. }) if path == missing
        ));
    }

    #[test]
    fn invalid_pattern_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = enumerate(tmp.path(), &["[".to_string()]);
        assert!(matches!(result, Err(ScanError::Pattern(_))));
    }

    #[test]
    fn listing_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        for name in ["zz.md", "aa.md", "mm/nested.md"] {
            touch(&tmp.path().join(name));
        }
        let first = rel_listing(tmp.path(), &[]);
        let second = rel_listing(tmp.path(), &[]);
        assert_eq!(first, second);
    }
}
