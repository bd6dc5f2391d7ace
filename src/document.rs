//! Shared types flowing through the build pipeline.
//!
//! A [`Document`] is one file's in-memory representation: a metadata bag
//! (populated from front-matter when present), the raw content bytes, the
//! POSIX permission bits captured at read time, and the stat data plugins
//! commonly want (size, mtime).
//!
//! The [`DocumentStore`] maps each document's *relative* path to the document
//! itself. The relative path is the document's identity for the whole build:
//! it is assigned once by the read phase and never rewritten. Plugins may
//! insert, remove, or replace entries, change metadata, and swap out
//! contents, but the store is a pure key→value mapping — iteration order
//! carries no meaning.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// Arbitrary string-keyed metadata attached to a document or a build.
///
/// Values are JSON-shaped variants (string, number, boolean, sequence,
/// nested mapping) because plugins contribute fields with no fixed schema.
pub type Metadata = BTreeMap<String, Value>;

/// The full mapping from relative path to document, threaded through every
/// pipeline phase of one build and discarded afterwards.
pub type DocumentStore = BTreeMap<PathBuf, Document>;

/// One file flowing through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Fields parsed from the file's front-matter block, empty otherwise.
    /// Plugins add and change fields freely.
    pub metadata: Metadata,
    /// The content body. If a front-matter block was parsed this is the
    /// post-header remainder; otherwise it is the whole file verbatim.
    pub contents: Vec<u8>,
    /// POSIX permission bits captured at read time (owner/type bits
    /// excluded). `None` on platforms without unix permissions; the writer
    /// skips chmod when absent.
    pub mode: Option<u32>,
    /// OS stat data retained for plugin use.
    pub stats: FileStats,
}

impl Document {
    /// Build a document from raw contents with empty metadata.
    pub fn from_contents(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            ..Self::default()
        }
    }
}

/// OS file metadata captured when a document is loaded.
#[derive(Debug, Clone, Default)]
pub struct FileStats {
    /// File size in bytes at read time.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
}
