//! External tools driven by the deployer.
//!
//! ## Requirements
//!
//! - `docker` to build images (skipped with `--skip-build`)
//! - `kind` to load images into the local cluster (skipped with `--skip-build`)
//! - `kubectl` pointed at that cluster

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use tracing::trace;

use crate::core::manifest::Kind;
use crate::error::{DeployError, Result};

/// Replica counts of a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollout {
    pub ready: i32,
    pub desired: i32,
}

impl Rollout {
    pub fn is_complete(&self) -> bool {
        self.desired > 0 && self.ready >= self.desired
    }
}

/// Parse `<ready>/<desired>` as printed by the rollout jsonpath query.
///
/// kubectl prints nothing for `readyReplicas` until a pod is ready, so an
/// empty count reads as zero.
pub fn parse_rollout(raw: &str) -> Option<Rollout> {
    let (ready, desired) = raw.trim().split_once('/')?;
    let count = |s: &str| -> Option<i32> {
        let s = s.trim();
        if s.is_empty() {
            Some(0)
        } else {
            s.parse().ok()
        }
    };
    Some(Rollout {
        ready: count(ready)?,
        desired: count(desired)?,
    })
}

/// Build, load and cluster operations.
///
/// Every method maps a non-zero exit status to a [`DeployError`].
pub trait Toolchain {
    /// Fail with `DeployError::ToolNotFound` unless `program` is runnable.
    fn require(&self, program: &str) -> Result<()>;

    /// Build `image` from `dockerfile` with `context` as build context.
    fn build_image(&self, image: &str, dockerfile: &Path, context: &Path) -> Result<()>;

    /// Load a locally built image into the named cluster.
    fn load_image(&self, image: &str, cluster: &str) -> Result<()>;

    fn namespace_exists(&self, namespace: &str) -> Result<bool>;

    /// Apply one manifest file.
    fn apply(&self, manifest: &Path, namespace: &str) -> Result<()>;

    /// Current replica counts of a Deployment or StatefulSet.
    fn rollout(&self, kind: Kind, name: &str, namespace: &str) -> Result<Rollout>;

    /// Human readable listing of everything in the namespace.
    fn status(&self, namespace: &str) -> Result<String>;
}

/// [`Toolchain`] backed by the `docker`, `kind` and `kubectl` CLIs
#[derive(Debug, Clone, Default)]
pub struct CommandToolchain;

impl CommandToolchain {
    pub fn new() -> Self {
        Self
    }

    fn output<I, S>(program: &str, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args);
        trace!(?cmd, "running");

        cmd.output().map_err(|source| {
            DeployError::Spawn {
                program: program.to_string(),
                source,
            }
            .into()
        })
    }
}

/// Exit status plus the last line of stderr, for error messages.
fn describe(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    match stderr.lines().rev().find(|line| !line.trim().is_empty()) {
        Some(line) => format!("{} ({})", output.status, line.trim()),
        None => output.status.to_string(),
    }
}

impl Toolchain for CommandToolchain {
    fn require(&self, program: &str) -> Result<()> {
        which::which(program)
            .map(|_| ())
            .map_err(|_| DeployError::ToolNotFound(program.to_string()).into())
    }

    fn build_image(&self, image: &str, dockerfile: &Path, context: &Path) -> Result<()> {
        let output = Self::output(
            "docker",
            [
                OsStr::new("build"),
                OsStr::new("-t"),
                OsStr::new(image),
                OsStr::new("-f"),
                dockerfile.as_os_str(),
                context.as_os_str(),
            ],
        )?;

        if !output.status.success() {
            return Err(DeployError::ImageBuild {
                image: image.to_string(),
                status: describe(&output),
            }
            .into());
        }
        Ok(())
    }

    fn load_image(&self, image: &str, cluster: &str) -> Result<()> {
        let output = Self::output("kind", ["load", "docker-image", image, "--name", cluster])?;

        if !output.status.success() {
            return Err(DeployError::ImageLoad {
                image: image.to_string(),
                cluster: cluster.to_string(),
                status: describe(&output),
            }
            .into());
        }
        Ok(())
    }

    fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        let output = Self::output("kubectl", ["get", "namespace", namespace, "-o", "name"])?;
        Ok(output.status.success())
    }

    fn apply(&self, manifest: &Path, namespace: &str) -> Result<()> {
        let output = Self::output(
            "kubectl",
            [
                OsStr::new("apply"),
                OsStr::new("-n"),
                OsStr::new(namespace),
                OsStr::new("-f"),
                manifest.as_os_str(),
            ],
        )?;

        if !output.status.success() {
            return Err(DeployError::Apply {
                path: manifest.to_path_buf(),
                status: describe(&output),
            }
            .into());
        }
        Ok(())
    }

    fn rollout(&self, kind: Kind, name: &str, namespace: &str) -> Result<Rollout> {
        let output = Self::output(
            "kubectl",
            [
                "get",
                kind.resource(),
                name,
                "-n",
                namespace,
                "-o",
                "jsonpath={.status.readyReplicas}/{.spec.replicas}",
            ],
        )?;

        if !output.status.success() {
            return Err(DeployError::Query(describe(&output)).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_rollout(&stdout).ok_or_else(|| {
            DeployError::Query(format!("unexpected rollout status {:?}", stdout.trim())).into()
        })
    }

    fn status(&self, namespace: &str) -> Result<String> {
        let output = Self::output("kubectl", ["get", "all", "-n", namespace])?;

        if !output.status.success() {
            return Err(DeployError::Query(describe(&output)).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
