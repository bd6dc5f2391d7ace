//! Document loading.
//!
//! Turns one file on disk into a [`Document`]: stat, read, optional
//! front-matter extraction, and capture of the permission bits and stat data
//! the writer and plugins need later.
//!
//! Error classification matters here. A malformed front-matter block is a
//! *content* problem ([`LoadError::InvalidFrontmatter`]) and passes through
//! untouched; every other failure in the load sequence is an I/O problem
//! wrapped as [`LoadError::FailedRead`] with the offending path.

use crate::document::{Document, FileStats};
use crate::frontmatter::{self, FrontmatterError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("invalid front-matter in the file at: {path}")]
    InvalidFrontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("failed to read the file at: {path}")]
    FailedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load `path` into a document.
///
/// When `parse_frontmatter` is set and the file is valid UTF-8, a leading
/// front-matter block becomes the document's metadata and the contents
/// shrink to the remaining body. Binary files and files without a block come
/// through verbatim with empty metadata.
pub fn load(path: &Path, parse_frontmatter: bool) -> Result<Document, LoadError> {
    let failed_read = |source| LoadError::FailedRead {
        path: path.to_path_buf(),
        source,
    };

    let stat = fs::metadata(path).map_err(failed_read)?;
    let buffer = fs::read(path).map_err(failed_read)?;

    let mut doc = match text_of(&buffer, parse_frontmatter) {
        Some(text) => match frontmatter::parse(text) {
            Ok(Some(parsed)) => Document {
                metadata: parsed.metadata,
                contents: parsed.body.into_bytes(),
                ..Document::default()
            },
            Ok(None) => Document::from_contents(buffer),
            Err(source) => {
                return Err(LoadError::InvalidFrontmatter {
                    path: path.to_path_buf(),
                    source,
                });
            }
        },
        None => Document::from_contents(buffer),
    };

    doc.mode = permission_bits(&stat);
    doc.stats = FileStats {
        size: stat.len(),
        modified: stat.modified().ok(),
    };
    Ok(doc)
}

/// The buffer as text, if front-matter parsing applies to it.
fn text_of(buffer: &[u8], parse_frontmatter: bool) -> Option<&str> {
    if !parse_frontmatter {
        return None;
    }
    std::str::from_utf8(buffer).ok()
}

#[cfg(unix)]
fn permission_bits(stat: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(stat.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(_stat: &fs::Metadata) -> Option<u32> {
    None
}
