//! The build pipeline.
//!
//! [`Pipeline`] ties the phases together. A build walks a fixed sequence:
//!
//! ```text
//! clean (optional) → read → run plugins → write → done
//! ```
//!
//! The read phase enumerates the source tree and loads every file into a
//! [`DocumentStore`] in bounded concurrent batches. Plugins then run
//! strictly one after another against the store, each seeing the complete
//! output of all prior plugins. The write phase mirrors the final store to
//! the destination, again in bounded batches. Any stage failure aborts the
//! build immediately — no retry, no partial-success result — though a write
//! failure can leave the destination partially written.
//!
//! ## Plugins
//!
//! A plugin is anything implementing [`Plugin`]: it receives the mutable
//! store and the pipeline as its build context (settings, global metadata,
//! path resolution, and the read/write primitives for re-entry). The chain
//! is an explicit ordered slice passed to [`Pipeline::build`] or
//! [`Pipeline::run`] — there is no registration state on the pipeline.
//!
//! ```no_run
//! use smelter::{Pipeline, Plugin, Settings};
//!
//! let settings = Settings::new(".");
//! let uppercase: Box<dyn Plugin> = Box::new(
//!     |files: &mut smelter::DocumentStore, _: &Pipeline| -> Result<(), smelter::PluginError> {
//!         for doc in files.values_mut() {
//!             doc.contents.make_ascii_uppercase();
//!         }
//!         Ok(())
//!     },
//! );
//! let files = Pipeline::new(settings).build(&[uppercase])?;
//! # Ok::<(), smelter::BuildError>(())
//! ```

use crate::batch;
use crate::document::{Document, DocumentStore, Metadata};
use crate::load::{self, LoadError};
use crate::scan::{self, ScanError};
use crate::settings::{Settings, SettingsError};
use crate::write::{self, WriteError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure signaled by a plugin; halts the chain immediately.
pub type PluginError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One transformation stage in the middleware chain.
///
/// Implemented for free by closures of the matching shape. A plugin must not
/// retain references into the store beyond its own invocation — the next
/// stage may mutate it.
pub trait Plugin: Send + Sync {
    fn apply(&self, files: &mut DocumentStore, pipeline: &Pipeline) -> Result<(), PluginError>;
}

impl<F> Plugin for F
where
    F: Fn(&mut DocumentStore, &Pipeline) -> Result<(), PluginError> + Send + Sync,
{
    fn apply(&self, files: &mut DocumentStore, pipeline: &Pipeline) -> Result<(), PluginError> {
        self(files, pipeline)
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("failed to clean the destination directory at: {path}")]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("plugin failed: {0}")]
    Plugin(PluginError),
}

/// The build orchestrator. Owns the settings; the document store lives only
/// for the duration of one `build` call.
#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The global metadata bag, for plugin use.
    pub fn metadata(&self) -> &Metadata {
        self.settings.metadata()
    }

    /// Run a full build and return the final document store.
    ///
    /// Cleans the destination (when the clean flag is set), reads the source
    /// tree, runs the plugin chain in order, and writes the result. The
    /// first failure in any stage aborts the rest.
    pub fn build(&self, plugins: &[Box<dyn Plugin>]) -> Result<DocumentStore, BuildError> {
        self.settings.validate()?;
        if self.settings.clean() {
            self.clean_destination()?;
        }
        let mut files = self.read()?;
        self.run(&mut files, plugins)?;
        self.write(&files)?;
        Ok(files)
    }

    /// Execute the plugin chain, strictly in order, against `files`.
    ///
    /// Each plugin completes (or fails) before the next starts; a failure
    /// halts the chain and later plugins never run.
    pub fn run(
        &self,
        files: &mut DocumentStore,
        plugins: &[Box<dyn Plugin>],
    ) -> Result<(), BuildError> {
        for plugin in plugins {
            plugin.apply(files, self).map_err(BuildError::Plugin)?;
        }
        Ok(())
    }

    /// Read the configured source directory into a document store.
    pub fn read(&self) -> Result<DocumentStore, BuildError> {
        self.read_dir(&self.settings.source())
    }

    /// Read an explicit directory into a document store, keyed by path
    /// relative to `dir`.
    ///
    /// Loads run in batches capped at the configured concurrency bound.
    /// Store assembly is deterministic regardless of intra-batch completion
    /// order because results are keyed by relative path.
    pub fn read_dir(&self, dir: &Path) -> Result<DocumentStore, BuildError> {
        let paths = scan::enumerate(dir, self.settings.ignores())?;
        let parse_frontmatter = self.settings.frontmatter();
        let docs = batch::run_batched(&paths, self.settings.max_open_files(), |path| {
            load::load(path, parse_frontmatter)
        })?;

        let mut files = DocumentStore::new();
        for (path, doc) in paths.iter().zip(docs) {
            let rel = path
                .strip_prefix(dir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            files.insert(rel, doc);
        }
        Ok(files)
    }

    /// Load a single file. Relative paths resolve against the source
    /// directory.
    pub fn read_file(&self, file: &Path) -> Result<Document, LoadError> {
        let abs = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.settings.source().join(file)
        };
        load::load(&abs, self.settings.frontmatter())
    }

    /// Write a document store to the configured destination directory.
    pub fn write(&self, files: &DocumentStore) -> Result<(), BuildError> {
        self.write_store(files, &self.settings.destination())
    }

    /// Write a document store to an explicit directory, mirroring each
    /// entry's relative path. Writes run in batches capped at the configured
    /// concurrency bound; the first failure halts the remaining batches.
    pub fn write_store(&self, files: &DocumentStore, dir: &Path) -> Result<(), BuildError> {
        let entries: Vec<(&PathBuf, &Document)> = files.iter().collect();
        batch::run_batched(&entries, self.settings.max_open_files(), |(rel, doc)| {
            write::write_file(&dir.join(rel), doc)
        })?;
        Ok(())
    }

    /// Write a single document. Relative paths resolve against the
    /// destination directory.
    pub fn write_file(&self, file: &Path, doc: &Document) -> Result<(), WriteError> {
        let abs = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.settings.destination().join(file)
        };
        write::write_file(&abs, doc)
    }

    /// Remove the destination directory. A missing destination is fine.
    fn clean_destination(&self) -> Result<(), BuildError> {
        let dest = self.settings.destination();
        match fs::remove_dir_all(&dest) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(BuildError::Clean { path: dest, source }),
        }
    }
}
