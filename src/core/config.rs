//! Project configuration.
//!
//! Reads the optional `.kubify.toml` in the project root. Every value is
//! optional; command-line flags take precedence over anything set here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::plan::DatabasePolicy;
use crate::error::{ConfigError, Result};

/// Contents of `.kubify.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,
}

/// The `[project]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub namespace: Option<String>,
    /// Ingress host
    pub host: Option<String>,
    pub pvc_size: Option<String>,
    pub replicas: Option<i32>,
    /// kind cluster images are loaded into
    pub cluster: Option<String>,
    pub db_policy: Option<DatabasePolicy>,
    /// Manifest output directory, relative to the project root
    pub output: Option<PathBuf>,
}

impl ProjectConfig {
    /// Path of the configuration file under `root`
    pub fn path(root: &Path) -> PathBuf {
        root.join(constants::CONFIG_FILE)
    }

    /// Load `.kubify.toml` from `root`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys and
    /// `ConfigError::InvalidReplicas` for a replica count below one.
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let path = Self::path(root);
        if !path.exists() {
            debug!(path = %path.display(), "no project config");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        debug!(path = %path.display(), ?config, "project config loaded");
        Ok(Some(config))
    }

    /// Validate values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if let Some(replicas) = self.project.replicas {
            if replicas < 1 {
                return Err(ConfigError::InvalidReplicas(replicas).into());
            }
        }
        Ok(())
    }
}
