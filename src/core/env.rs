//! Env file parsing.
//!
//! Reads `.env`-style files of `KEY=VALUE` lines. The parser is deliberately
//! lenient: malformed lines are dropped rather than reported.

use crate::error::{Result, ScanError};
use std::path::{Path, PathBuf};

/// A parsed env file
#[derive(Debug, Clone)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
    path: PathBuf,
}

impl EnvFile {
    /// Parse an env file from disk
    ///
    /// # Errors
    ///
    /// Returns `ScanError::ReadFile` if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ScanError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse(&contents, path))
    }

    /// Parse env file contents
    ///
    /// Skips empty lines, comments (lines starting with #) and lines without
    /// an `=`. Keys and values are trimmed and one layer of matching quotes is
    /// removed from the value. Nothing is unescaped.
    pub fn parse(contents: &str, path: impl Into<PathBuf>) -> Self {
        let mut entries = Vec::new();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                entries.push((key.to_string(), strip_quotes(value.trim()).to_string()));
            }
        }

        Self {
            entries,
            path: path.into(),
        }
    }

    /// Get the last value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All entries in file order, duplicates included
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }

    raw
}
