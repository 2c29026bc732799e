//! Remote project sources.
//!
//! Clones a GitHub repository so it can be scanned like a local directory.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{DeployError, Result, SourceError};

static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$")
        .expect("valid regex")
});

static SSH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@github\.com:([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?$")
        .expect("valid regex")
});

/// A validated GitHub repository URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrl {
    url: String,
    owner: String,
    name: String,
}

impl RepositoryUrl {
    /// Accepts `https://github.com/<owner>/<repo>[.git]` and
    /// `git@github.com:<owner>/<repo>[.git]`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidRepositoryUrl` for anything else.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let captures = HTTPS_URL
            .captures(raw)
            .or_else(|| SSH_URL.captures(raw))
            .ok_or_else(|| SourceError::InvalidRepositoryUrl(raw.to_string()))?;

        // `.` and `..` would resolve outside the clone directory.
        let dots_only = |part: &str| part.chars().all(|c| c == '.');
        if dots_only(&captures[1]) || dots_only(&captures[2]) {
            return Err(SourceError::InvalidRepositoryUrl(raw.to_string()).into());
        }

        Ok(Self {
            url: raw.to_string(),
            owner: captures[1].to_string(),
            name: captures[2].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name without `.git`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shallow clone into `parent/<name>` and return the checkout path.
    ///
    /// An existing checkout at that path is reused as is.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ToolNotFound` without `git` on PATH and
    /// `SourceError::Clone` if the clone fails.
    pub fn fetch(&self, parent: &Path) -> Result<PathBuf> {
        let dest = parent.join(&self.name);
        if dest.join(".git").is_dir() {
            info!(path = %dest.display(), "reusing existing checkout");
            return Ok(dest);
        }

        which::which("git").map_err(|_| DeployError::ToolNotFound("git".to_string()))?;

        debug!(url = %self.url, dest = %dest.display(), "cloning");
        let output = Command::new("git")
            .args(["clone", "--depth", "1", &self.url])
            .arg(&dest)
            .output()
            .map_err(|source| DeployError::Spawn {
                program: "git".to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let status = match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                Some(line) => format!("{} ({})", output.status, line.trim()),
                None => output.status.to_string(),
            };
            return Err(SourceError::Clone {
                url: self.url.clone(),
                status,
            }
            .into());
        }

        Ok(dest)
    }
}

impl std::fmt::Display for RepositoryUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}
