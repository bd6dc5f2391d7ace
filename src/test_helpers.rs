//! Shared test utilities for the smelter test suite.
//!
//! Builds throwaway site trees in temp directories so pipeline tests can
//! exercise real filesystem behavior without fixtures checked into the repo.

use crate::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary working directory laid out like a conventional site:
/// `src/` for content, `build/` as the (initially absent) destination.
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    /// Settings rooted at this site's working directory, defaults elsewhere.
    pub fn settings(&self) -> Settings {
        Settings::new(self.dir.path())
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn destination(&self) -> PathBuf {
        self.dir.path().join("build")
    }

    /// Add a source file, creating parent directories as needed.
    pub fn add_file(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.source().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }
}

/// Create a site whose `src/` contains the given `(relative path, contents)`
/// pairs.
pub fn site_with(files: &[(&str, &str)]) -> TestSite {
    let site = TestSite {
        dir: TempDir::new().unwrap(),
    };
    fs::create_dir_all(site.source()).unwrap();
    for (rel, contents) in files {
        site.add_file(rel, contents);
    }
    site
}
