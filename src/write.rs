//! Document writing.
//!
//! The inverse of loading: place a document's contents at an absolute
//! destination path, creating parent directories as needed, and restore the
//! permission bits captured at read time. Any failure wraps the offending
//! path so the build error names the file, not just the syscall.

use crate::document::Document;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to write the file at: {path}")]
    FailedWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write one document to an absolute `path`.
///
/// Parent directories are created on demand. When the document carries a
/// file mode, its permission bits are applied after the write; documents
/// without one (plugin-created, or loaded off unix) keep platform defaults.
pub fn write_file(path: &Path, doc: &Document) -> Result<(), WriteError> {
    let failed_write = |source| WriteError::FailedWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(failed_write)?;
    }
    fs::write(path, &doc.contents).map_err(failed_write)?;

    if let Some(mode) = doc.mode {
        set_permission_bits(path, mode).map_err(failed_write)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_permission_bits(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_permission_bits(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
