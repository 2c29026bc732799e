//! Deploy driver.
//!
//! Builds service images, loads them into a local cluster and applies the
//! rendered manifests. Image and apply failures abort the run; readiness
//! timeouts and status failures only produce warnings.

mod toolchain;

pub use toolchain::{parse_rollout, CommandToolchain, Rollout, Toolchain};

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::constants::{DEFAULT_CLUSTER, ROLLOUT_ATTEMPTS, ROLLOUT_INTERVAL_SECS};
use crate::core::manifest::{Kind, ManifestSet};
use crate::core::outcome::{Outcome, Warning};
use crate::core::plan::Plan;
use crate::error::{DeployError, Result};

/// Bounded polling used for namespace and rollout waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            attempts: ROLLOUT_ATTEMPTS,
            interval: Duration::from_secs(ROLLOUT_INTERVAL_SECS),
        }
    }
}

impl WaitPolicy {
    /// Call `probe` until it returns true or attempts run out.
    ///
    /// Sleeps between attempts, never after the last one.
    fn poll(&self, mut probe: impl FnMut() -> bool) -> bool {
        for attempt in 1..=self.attempts {
            if probe() {
                return true;
            }
            if attempt < self.attempts {
                std::thread::sleep(self.interval);
            }
        }
        false
    }
}

/// Deploy switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub cluster: String,
    pub skip_build: bool,
    pub skip_wait: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            cluster: DEFAULT_CLUSTER.to_string(),
            skip_build: false,
            skip_wait: false,
        }
    }
}

/// Progress reported while deploying
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Building { image: String },
    Loading { image: String, cluster: String },
    NamespaceExists { namespace: String },
    Applying { file: String },
    Waiting { kind: Kind, name: String },
    Ready { kind: Kind, name: String },
    Status(String),
}

/// Runs a deployment through a [`Toolchain`]
pub struct Deployer<T: Toolchain> {
    toolchain: T,
    wait: WaitPolicy,
}

impl<T: Toolchain> Deployer<T> {
    pub fn new(toolchain: T) -> Self {
        Self {
            toolchain,
            wait: WaitPolicy::default(),
        }
    }

    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Deploy rendered manifests that were written to `dir`.
    ///
    /// `report` receives progress events in order.
    pub fn deploy(
        &self,
        plan: &Plan,
        manifests: &ManifestSet,
        dir: &Path,
        options: &DeployOptions,
        report: &mut dyn FnMut(Event),
    ) -> Outcome {
        self.run(plan, manifests, dir, options, report).into()
    }

    fn run(
        &self,
        plan: &Plan,
        manifests: &ManifestSet,
        dir: &Path,
        options: &DeployOptions,
        report: &mut dyn FnMut(Event),
    ) -> Result<Vec<Warning>> {
        let namespace = plan.namespace.as_str();
        let mut warnings = plan.warnings.clone();

        self.toolchain.require("kubectl")?;
        if !options.skip_build {
            self.toolchain.require("docker")?;
            self.toolchain.require("kind")?;
            self.build_and_load(plan, &options.cluster, report)?;
        }

        self.apply_namespace(manifests, dir, namespace, report)?;

        for manifest in manifests.iter().filter(|m| m.kind != Kind::Namespace) {
            report(Event::Applying {
                file: manifest.file_name.clone(),
            });
            self.toolchain
                .apply(&dir.join(&manifest.file_name), namespace)?;
        }
        info!(count = manifests.len(), %namespace, "manifests applied");

        if !options.skip_wait {
            for workload in manifests.workloads() {
                report(Event::Waiting {
                    kind: workload.kind,
                    name: workload.name.clone(),
                });
                if self.wait_for_rollout(workload.kind, &workload.name, namespace) {
                    report(Event::Ready {
                        kind: workload.kind,
                        name: workload.name.clone(),
                    });
                } else {
                    warn!(kind = %workload.kind, name = %workload.name, "rollout timed out");
                    warnings.push(Warning::RolloutTimeout {
                        kind: workload.kind.to_string(),
                        name: workload.name.clone(),
                    });
                }
            }
        }

        match self.toolchain.status(namespace) {
            Ok(listing) => report(Event::Status(listing)),
            Err(e) => {
                warn!(error = %e, "status listing failed");
                warnings.push(Warning::StatusUnavailable(e.to_string()));
            }
        }

        Ok(warnings)
    }

    fn build_and_load(
        &self,
        plan: &Plan,
        cluster: &str,
        report: &mut dyn FnMut(Event),
    ) -> Result<()> {
        for svc in &plan.services {
            report(Event::Building {
                image: svc.image().to_string(),
            });
            self.toolchain
                .build_image(svc.image(), svc.dockerfile(), svc.directory())?;

            report(Event::Loading {
                image: svc.image().to_string(),
                cluster: cluster.to_string(),
            });
            self.toolchain.load_image(svc.image(), cluster)?;
            debug!(image = svc.image(), cluster, "image loaded");
        }
        Ok(())
    }

    /// Apply the Namespace object unless it already exists, then wait for it.
    fn apply_namespace(
        &self,
        manifests: &ManifestSet,
        dir: &Path,
        namespace: &str,
        report: &mut dyn FnMut(Event),
    ) -> Result<()> {
        if self.toolchain.namespace_exists(namespace)? {
            report(Event::NamespaceExists {
                namespace: namespace.to_string(),
            });
            return Ok(());
        }

        if let Some(manifest) = manifests.of_kind(Kind::Namespace).next() {
            report(Event::Applying {
                file: manifest.file_name.clone(),
            });
            self.toolchain
                .apply(&dir.join(&manifest.file_name), namespace)?;
        }

        let available = self
            .wait
            .poll(|| self.toolchain.namespace_exists(namespace).unwrap_or(false));
        if !available {
            return Err(DeployError::NamespaceUnavailable(namespace.to_string()).into());
        }
        Ok(())
    }

    fn wait_for_rollout(&self, kind: Kind, name: &str, namespace: &str) -> bool {
        self.wait.poll(|| match self.toolchain.rollout(kind, name, namespace) {
            Ok(rollout) => {
                debug!(%kind, name, ready = rollout.ready, desired = rollout.desired, "rollout");
                rollout.is_complete()
            }
            Err(e) => {
                debug!(%kind, name, error = %e, "rollout query failed");
                false
            }
        })
    }
}
