//! Build settings.
//!
//! [`Settings`] is the long-lived configuration entity consumed by the
//! pipeline: working directory, source and destination directories, the
//! global metadata bag, the concurrency bound, the clean and front-matter
//! flags, and the ignore list. It is mutated only through explicit setters
//! before or between builds — there is no combined get-or-set accessor.
//!
//! ## Settings File
//!
//! Settings can also be loaded from a `smelter.toml`:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! directory = "."           # Working directory; roots all relative paths
//! source = "src"            # Source directory, relative to `directory`
//! destination = "build"     # Destination directory, relative to `directory`
//! clean = true              # Delete the destination before each build
//! frontmatter = true        # Parse front-matter blocks in text files
//! ignores = []              # Glob patterns excluded during enumeration
//! # max_open_files = 64     # Concurrency bound (omit for unbounded)
//!
//! [metadata]                # Global metadata, available to every plugin
//! # site_title = "My Site"
//! ```
//!
//! Files are sparse — override just the values you want. Unknown keys are
//! rejected to catch typos early.

use crate::document::Metadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Settings validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration.
///
/// All fields have defaults matching a conventional layout (`src/` →
/// `build/`, clean builds, front-matter on, unbounded concurrency). A
/// settings file needs only the values it wants to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Working directory. Every relative path in the settings resolves
    /// against this root.
    directory: PathBuf,
    /// Source directory, relative to the working directory.
    source: PathBuf,
    /// Destination directory, relative to the working directory.
    destination: PathBuf,
    /// Global metadata injected into the build context for plugin use.
    metadata: Metadata,
    /// Maximum number of simultaneously in-flight file operations per
    /// phase. `None` means unbounded.
    max_open_files: Option<usize>,
    /// Whether the destination directory is deleted before each build.
    clean: bool,
    /// Whether to attempt front-matter parsing on text files.
    frontmatter: bool,
    /// Glob patterns excluded during source enumeration. A pattern matches
    /// a file name or a source-relative path; matching a directory prunes
    /// its whole subtree.
    ignores: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            source: PathBuf::from("src"),
            destination: PathBuf::from("build"),
            metadata: Metadata::new(),
            max_open_files: None,
            clean: true,
            frontmatter: true,
            ignores: Vec::new(),
        }
    }
}

impl Settings {
    /// Settings rooted at a working directory, defaults everywhere else.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Validate settings values before a build.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_open_files == Some(0) {
            return Err(SettingsError::Validation(
                "max_open_files must be at least 1 (omit for unbounded)".into(),
            ));
        }
        Ok(())
    }

    // Getters.

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Source directory resolved against the working directory.
    pub fn source(&self) -> PathBuf {
        self.path(&self.source)
    }

    /// Destination directory resolved against the working directory.
    pub fn destination(&self) -> PathBuf {
        self.path(&self.destination)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn max_open_files(&self) -> Option<usize> {
        self.max_open_files
    }

    pub fn clean(&self) -> bool {
        self.clean
    }

    pub fn frontmatter(&self) -> bool {
        self.frontmatter
    }

    pub fn ignores(&self) -> &[String] {
        &self.ignores
    }

    /// Resolve a path against the working directory. Absolute paths stand
    /// alone.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        let rel = rel.as_ref();
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.directory.join(rel)
        }
    }

    // Setters. Each takes its value by ownership, so callers keep no handle
    // that could mutate settings state after the fact.

    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) -> &mut Self {
        self.directory = directory.into();
        self
    }

    pub fn set_source(&mut self, source: impl Into<PathBuf>) -> &mut Self {
        self.source = source.into();
        self
    }

    pub fn set_destination(&mut self, destination: impl Into<PathBuf>) -> &mut Self {
        self.destination = destination.into();
        self
    }

    pub fn set_metadata(&mut self, metadata: Metadata) -> &mut Self {
        self.metadata = metadata;
        self
    }

    /// Cap simultaneous in-flight file operations, or `None` for unbounded.
    pub fn set_max_open_files(&mut self, max: Option<usize>) -> &mut Self {
        self.max_open_files = max;
        self
    }

    pub fn set_clean(&mut self, clean: bool) -> &mut Self {
        self.clean = clean;
        self
    }

    pub fn set_frontmatter(&mut self, frontmatter: bool) -> &mut Self {
        self.frontmatter = frontmatter;
        self
    }

    /// Append patterns to the ignore list, preserving order.
    pub fn add_ignores<I, S>(&mut self, patterns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignores.extend(patterns.into_iter().map(Into::into));
        self
    }
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    settings.validate()?;
    Ok(settings)
}

/// The stock settings file with all options documented, for `gen-config`.
pub fn stock_settings_toml() -> &'static str {
    r##"# Smelter Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Working directory. Every relative path below resolves against it.
directory = "."

# Source directory, read recursively at the start of each build.
source = "src"

# Destination directory, mirrored from the source tree.
destination = "build"

# Delete the destination directory before each build.
clean = true

# Parse front-matter blocks at the start of text files.
frontmatter = true

# Glob patterns excluded during enumeration. A pattern matches a file name
# or a source-relative path; matching a directory skips its whole subtree.
ignores = []

# Maximum simultaneously open files per build phase. Omit for unbounded.
# max_open_files = 64

# Global metadata, available to every plugin through the build context.
[metadata]
# site_title = "My Site"
"##
}
