//! Variable and role classification.
//!
//! Both classifiers are ordered rule lists evaluated first-match. The order
//! is part of the contract: a Dockerfile mentioning both nginx and python is
//! a frontend because the frontend rule runs first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::constants::SECRET_MARKERS;
use crate::core::dockerfile;
use crate::core::domain::{EnvVariable, Role};
use crate::core::env::EnvFile;
use crate::error::{Result, ScanError};

/// Whether an env key names a secret.
///
/// True iff the key contains any of [`SECRET_MARKERS`] (case-sensitive).
/// Keys like `KEYBOARD_LAYOUT` are secrets too; that is the heuristic.
pub fn is_secret(key: &str) -> bool {
    SECRET_MARKERS.iter().any(|marker| key.contains(marker))
}

/// Env variables partitioned into config and secret buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub config: BTreeMap<String, String>,
    pub secret: BTreeMap<String, String>,
}

impl Classified {
    /// Classify key/value pairs. Later pairs overwrite earlier ones.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut classified = Self::default();
        for (key, value) in pairs {
            classified.insert(EnvVariable::new(key, value));
        }
        classified
    }

    fn insert(&mut self, var: EnvVariable) {
        let bucket = if var.is_secret() {
            &mut self.secret
        } else {
            &mut self.config
        };
        bucket.insert(var.key().to_string(), var.value().to_string());
    }

    /// Whether any bucket holds the key.
    pub fn contains(&self, key: &str) -> bool {
        self.config.contains_key(key) || self.secret.contains_key(key)
    }

    /// All variables, config first, each bucket in key order.
    pub fn variables(&self) -> Vec<EnvVariable> {
        self.config
            .iter()
            .chain(self.secret.iter())
            .map(|(k, v)| EnvVariable::new(k.as_str(), v.as_str()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty() && self.secret.is_empty()
    }
}

/// Parse and classify env files in order.
///
/// # Errors
///
/// Returns `ScanError::ReadFile` if any file cannot be read.
pub fn classify_variables(files: &[PathBuf]) -> Result<Classified> {
    let mut classified = Classified::default();

    for path in files {
        let env = EnvFile::load(path)?;
        debug!(path = %path.display(), entries = env.len(), "parsed env file");
        for (key, value) in env.entries() {
            classified.insert(EnvVariable::new(key.as_str(), value.as_str()));
        }
    }

    debug!(
        config = classified.config.len(),
        secret = classified.secret.len(),
        "classified variables"
    );

    Ok(classified)
}

/// One role heuristic
pub struct RoleRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub role: Role,
}

/// Role heuristics in evaluation order.
pub static ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        name: "nginx or EXPOSE 80",
        matches: looks_like_frontend,
        role: Role::Frontend,
    },
    RoleRule {
        name: "python, flask or node",
        matches: looks_like_backend,
        role: Role::Backend,
    },
];

fn looks_like_frontend(content: &str) -> bool {
    content.to_lowercase().contains("nginx") || dockerfile::exposes(content, 80)
}

fn looks_like_backend(content: &str) -> bool {
    let content = content.to_lowercase();
    ["python", "flask", "node"]
        .iter()
        .any(|marker| content.contains(marker))
}

/// Role for Dockerfile contents, falling back to `Custom(dir_name)`.
pub fn role_for(content: &str, dir_name: &str) -> Role {
    ROLE_RULES
        .iter()
        .find(|rule| (rule.matches)(content))
        .map(|rule| rule.role.clone())
        .unwrap_or_else(|| Role::Custom(dir_name.to_string()))
}

/// Classify a Dockerfile on disk.
///
/// # Errors
///
/// Returns `ScanError::ReadFile` if the Dockerfile cannot be read.
pub fn classify_role(dockerfile: &Path) -> Result<Role> {
    let content = read_dockerfile(dockerfile)?;
    Ok(role_for(&content, &directory_name(dockerfile)))
}

pub(crate) fn read_dockerfile(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|source| ScanError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content)
}

/// Base name of the directory containing a file.
pub(crate) fn directory_name(file: &Path) -> String {
    file.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
