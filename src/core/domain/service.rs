//! Service descriptor.
//!
//! One buildable container image discovered from a Dockerfile.

use super::role::Role;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a service's container port came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSource {
    /// First port of an EXPOSE directive
    Expose,
    /// Role fallback, no EXPOSE directive found
    Default,
}

/// A service built from one Dockerfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    role: Role,
    name: String,
    dockerfile: PathBuf,
    directory: PathBuf,
    port: u16,
    port_source: PortSource,
    image: String,
}

impl ServiceDescriptor {
    pub fn new(
        role: Role,
        name: String,
        dockerfile: PathBuf,
        port: u16,
        port_source: PortSource,
        image: String,
    ) -> Self {
        let directory = dockerfile
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            role,
            name,
            dockerfile,
            directory,
            port,
            port_source,
            image,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Workload name, unique within a plan
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dockerfile(&self) -> &Path {
        &self.dockerfile
    }

    /// Build context directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Container port
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn port_source(&self) -> PortSource {
        self.port_source
    }

    /// Fully tagged image reference
    pub fn image(&self) -> &str {
        &self.image
    }
}
