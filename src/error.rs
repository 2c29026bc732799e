//! Error types.
//!
//! Every fatal condition of a kubify run ends up in [`Error`]. Conditions that
//! degrade to a default value are not errors; they are reported as
//! [`crate::core::outcome::Warning`]s instead.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

/// Project configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid .kubify.toml: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("unknown database policy: {0} (expected explicit-host or absence)")]
    UnknownPolicy(String),

    #[error("replicas must be at least 1, got {0}")]
    InvalidReplicas(i32),

    #[error("invalid image tag: {0}")]
    InvalidTag(String),
}

/// Project scanning errors.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("project directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("no Dockerfiles found under {}", .0.display())]
    NoDockerfiles(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk project directory: {0}")]
    Walk(#[from] ignore::Error),
}

/// Errors from the external build, load and apply tools.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("required tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("image build failed for {image}: {status}")]
    ImageBuild { image: String, status: String },

    #[error("image load failed for {image} into cluster {cluster}: {status}")]
    ImageLoad {
        image: String,
        cluster: String,
        status: String,
    },

    #[error("kubectl apply failed for {}: {status}", path.display())]
    Apply { path: PathBuf, status: String },

    #[error("kubectl query failed: {0}")]
    Query(String),

    #[error("namespace {0} did not become available")]
    NamespaceUnavailable(String),
}

/// Errors from fetching a remote project.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("invalid GitHub repository URL: {0}")]
    InvalidRepositoryUrl(String),

    #[error("git clone of {url} failed: {status}")]
    Clone { url: String, status: String },
}

pub type Result<T> = std::result::Result<T, Error>;
