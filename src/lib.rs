//! # Smelter
//!
//! A minimal plugin-driven file transformation pipeline: the execution
//! engine beneath a static content build tool. Smelter enumerates a source
//! directory, loads every file (content, front-matter metadata, permission
//! bits) into an in-memory document store, passes the store through an
//! ordered chain of plugins, and mirrors the result to a destination
//! directory.
//!
//! # Architecture: One Build, Four Phases
//!
//! ```text
//! 1. Clean   build/ deleted            (optional, per the clean flag)
//! 2. Read    src/** → DocumentStore    (batched concurrent loads)
//! 3. Run     plugin chain, in order    (strictly sequential stages)
//! 4. Write   DocumentStore → build/**  (batched concurrent writes)
//! ```
//!
//! The store is the whole contract between phases: a pure mapping from
//! relative path to [`Document`]. Plugins are free to insert, remove, and
//! rewrite entries; the writer mirrors whatever survives. Smelter itself
//! ships no plugins — markdown rendering, templating, and asset pipelines
//! are external stages built on the [`Plugin`] trait.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`settings`] | The `Settings` entity: directories, flags, concurrency bound, ignore list, global metadata, TOML loading |
//! | [`document`] | `Document`, `Metadata`, and `DocumentStore` — the types threaded through every phase |
//! | [`scan`] | Deterministic recursive source enumeration with glob ignore patterns |
//! | [`frontmatter`] | Leading `---`-fenced YAML block extraction |
//! | [`load`] | One file → one `Document` (stat, read, front-matter, mode capture) |
//! | [`batch`] | Fixed-size concurrent batch scheduling for the I/O phases |
//! | [`write`] | One `Document` → one file (mkdir -p, write, chmod) |
//! | [`pipeline`] | The orchestrator: `Pipeline::build`, the `Plugin` contract, `BuildError` |
//!
//! # Design Decisions
//!
//! ## Batched Concurrency, Not a Work Queue
//!
//! Both I/O phases run in consecutive fixed-size batches: a batch of
//! `max_open_files` operations runs concurrently and completes before the
//! next batch starts. This caps open file descriptors with very little
//! machinery. Store assembly is keyed by relative path, so the result is
//! deterministic no matter how a batch's members interleave.
//!
//! ## Strictly Sequential Plugins
//!
//! Plugins never overlap: each one sees the complete output of all prior
//! stages and reports a single completion or failure. A plugin may fan out
//! internally however it likes; the pipeline only advances when it returns.
//! That keeps the plugin author's mental model simple and failure
//! attribution exact.
//!
//! ## Errors Name Files, Not Syscalls
//!
//! Every failure class — enumeration, read, front-matter, write, clean —
//! carries the offending path and chains the underlying cause. A malformed
//! front-matter block is deliberately distinct from an I/O error: it means
//! the file content is wrong, and it is never re-wrapped as a read failure.
//!
//! ## Whole-Build Abort
//!
//! The first failure anywhere aborts the build: no retries, no
//! partial-success result, no skipped-file recovery. In-flight writes in
//! the failing batch are allowed to finish, so a failed build may leave the
//! destination partially written — rerun with the clean flag set.

pub mod batch;
pub mod document;
pub mod frontmatter;
pub mod load;
pub mod pipeline;
pub mod scan;
pub mod settings;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use document::{Document, DocumentStore, FileStats, Metadata};
pub use pipeline::{BuildError, Pipeline, Plugin, PluginError};
pub use settings::{Settings, SettingsError};
