//! Test support utilities for kubify integration tests.
//!
//! Provides throwaway project directories and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Test project in its own temporary directory.
///
/// Child processes run with `.current_dir()` set to the project, so no
/// process-global state is touched and tests can run in parallel.
pub struct Test {
    /// Temporary directory holding the project
    pub dir: TempDir,
}

impl Test {
    /// Create an empty project.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a project from `(relative path, contents)` pairs.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let t = Self::new();
        for (rel, contents) in files {
            t.file(rel, contents);
        }
        t
    }

    /// Project with a flask backend, an nginx frontend, a `.env` naming a
    /// database host and an `init.sql`.
    pub fn full_stack() -> Self {
        Self::with_files(FULL_STACK)
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, contents: &str) -> &Self {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().expect("file has a parent")).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    /// Absolute path of a project-relative path.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Contents of a generated manifest under `k8s/`.
    pub fn manifest(&self, file_name: &str) -> String {
        let path = self.path("k8s").join(file_name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
    }

    /// Parsed generated manifest.
    pub fn manifest_yaml(&self, file_name: &str) -> serde_yaml::Value {
        serde_yaml::from_str(&self.manifest(file_name)).expect("manifest is valid YAML")
    }

    /// Sorted file names under `k8s/`.
    pub fn manifest_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path("k8s"))
            .expect("k8s directory exists")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
