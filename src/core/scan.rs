//! Project scanning.
//!
//! Walks a project directory and collects the files kubify cares about:
//! Dockerfiles, env files and SQL scripts.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, trace};

use crate::core::constants::{INIT_SQL, SKIPPED_DIRS};
use crate::error::{Result, ScanError};

/// Files discovered under a project root
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub root: PathBuf,
    pub dockerfiles: Vec<PathBuf>,
    pub env_files: Vec<PathBuf>,
    pub sql_files: Vec<PathBuf>,
}

impl ScanResult {
    /// First `init.sql` found, in path order.
    pub fn init_sql(&self) -> Option<&Path> {
        self.sql_files
            .iter()
            .find(|path| path.file_name().is_some_and(|name| name == INIT_SQL))
            .map(PathBuf::as_path)
    }

    pub fn has_init_sql(&self) -> bool {
        self.init_sql().is_some()
    }
}

/// What kind of file a path is, judged by name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Dockerfile,
    Env,
    Sql,
}

impl FileKind {
    /// Classify a file name.
    ///
    /// - `Dockerfile`, `Dockerfile.<variant>` and `<name>.Dockerfile`
    /// - `.env` and `.env.<suffix>`, except names ending in `.example`
    /// - anything ending in `.sql`
    pub fn of(name: &str) -> Option<Self> {
        if name == "Dockerfile" || name.starts_with("Dockerfile.") || name.ends_with(".Dockerfile")
        {
            return Some(Self::Dockerfile);
        }
        if (name == ".env" || name.starts_with(".env.")) && !name.ends_with(".example") {
            return Some(Self::Env);
        }
        if name.ends_with(".sql") {
            return Some(Self::Sql);
        }
        None
    }
}

/// Directory walker
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    excluded: Vec<PathBuf>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never descend into `path` (typically the manifest output directory).
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    /// Scan `root` recursively.
    ///
    /// Ignore files are not honored, since `.env` files are usually
    /// gitignored. Well-known dependency and VCS directories are skipped.
    /// Every list in the result is sorted by path.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::RootNotFound` if `root` is not a directory, or
    /// `ScanError::Walk` if traversal fails.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound(root.to_path_buf()).into());
        }

        let excluded = self.excluded.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let skipped = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name));
                !skipped && !excluded.iter().any(|path| path == entry.path())
            })
            .build();

        let mut result = ScanResult {
            root: root.to_path_buf(),
            ..ScanResult::default()
        };

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };

            let bucket = match FileKind::of(name) {
                Some(FileKind::Dockerfile) => &mut result.dockerfiles,
                Some(FileKind::Env) => &mut result.env_files,
                Some(FileKind::Sql) => &mut result.sql_files,
                None => continue,
            };
            trace!(path = %entry.path().display(), "found");
            bucket.push(entry.into_path());
        }

        result.dockerfiles.sort();
        result.env_files.sort();
        result.sql_files.sort();

        debug!(
            root = %root.display(),
            dockerfiles = result.dockerfiles.len(),
            env_files = result.env_files.len(),
            sql_files = result.sql_files.len(),
            "scan complete"
        );

        Ok(result)
    }
}
