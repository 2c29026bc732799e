//! Manifest rendering.
//!
//! Builds typed Kubernetes objects from a resolved [`Plan`] and serializes
//! each one to its own YAML document. Rendering is a pure function of the
//! plan: the same plan always yields byte-identical output.
//!
//! # Output layout
//!
//! ```text
//! 00-namespace.yaml
//! 01-configmap.yaml            (config variables present)
//! 02-secret.yaml               (secret variables present)
//! 03-postgres-init.yaml        (managed database with init.sql)
//! 04-postgres-pvc.yaml         (managed database, Deployment flavor)
//! 05-postgres-<workload>.yaml  (managed database)
//! 06-postgres-service.yaml     (managed database)
//! 10-<service>-deployment.yaml
//! 11-<service>-service.yaml
//! 90-ingress.yaml              (host given)
//! ```

mod database;
mod ingress;
mod workload;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use tracing::debug;

use crate::core::constants::MANAGED_BY;
use crate::core::plan::Plan;
use crate::error::Result;

/// Kind of a rendered object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Namespace,
    ConfigMap,
    Secret,
    PersistentVolumeClaim,
    Deployment,
    StatefulSet,
    Service,
    Ingress,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Namespace => "Namespace",
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::PersistentVolumeClaim => "PersistentVolumeClaim",
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::Service => "Service",
            Self::Ingress => "Ingress",
        }
    }

    /// Resource name understood by kubectl.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
            Self::PersistentVolumeClaim => "pvc",
            Self::Deployment => "deployment",
            Self::StatefulSet => "statefulset",
            Self::Service => "service",
            Self::Ingress => "ingress",
        }
    }

    /// Whether the object runs pods that can be waited on.
    pub fn is_workload(&self) -> bool {
        matches!(self, Self::Deployment | Self::StatefulSet)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub file_name: String,
    pub kind: Kind,
    pub name: String,
    pub yaml: String,
}

impl Manifest {
    fn new<T: Serialize>(file_name: String, kind: Kind, name: &str, object: &T) -> Result<Self> {
        Ok(Self {
            file_name,
            kind,
            name: name.to_string(),
            yaml: serde_yaml::to_string(object)?,
        })
    }
}

/// Every object rendered for a plan, in apply order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSet {
    manifests: Vec<Manifest>,
}

impl ManifestSet {
    /// Render a plan.
    ///
    /// # Errors
    ///
    /// Returns `Error::Yaml` if an object fails to serialize.
    pub fn render(plan: &Plan) -> Result<Self> {
        let mut set = Self::default();
        let ns = plan.namespace.as_str();

        set.push(Manifest::new(
            "00-namespace.yaml".into(),
            Kind::Namespace,
            ns,
            &workload::namespace(plan),
        )?);

        if plan.has_config() {
            set.push(Manifest::new(
                "01-configmap.yaml".into(),
                Kind::ConfigMap,
                &plan.config_map_name(),
                &workload::config_map(plan),
            )?);
        }

        if plan.has_secret() {
            set.push(Manifest::new(
                "02-secret.yaml".into(),
                Kind::Secret,
                &plan.secret_name(),
                &workload::secret(plan),
            )?);
        }

        if let Some(db) = &plan.database {
            for manifest in database::render(plan, db)? {
                set.push(manifest);
            }
        }

        for svc in &plan.services {
            set.push(Manifest::new(
                format!("10-{}-deployment.yaml", svc.name()),
                Kind::Deployment,
                svc.name(),
                &workload::deployment(plan, svc),
            )?);
            set.push(Manifest::new(
                format!("11-{}-service.yaml", svc.name()),
                Kind::Service,
                svc.name(),
                &workload::service(plan, svc),
            )?);
        }

        if let Some(ingress) = ingress::ingress(plan) {
            set.push(Manifest::new(
                "90-ingress.yaml".into(),
                Kind::Ingress,
                &ingress::name(plan),
                &ingress,
            )?);
        }

        debug!(manifests = set.len(), "rendered manifests");
        Ok(set)
    }

    fn push(&mut self, manifest: Manifest) {
        self.manifests.push(manifest);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Manifest> {
        self.manifests.iter()
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Manifest by file name.
    pub fn get(&self, file_name: &str) -> Option<&Manifest> {
        self.manifests.iter().find(|m| m.file_name == file_name)
    }

    /// All manifests of a kind.
    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &Manifest> {
        self.manifests.iter().filter(move |m| m.kind == kind)
    }

    /// Deployments and StatefulSets, in apply order.
    pub fn workloads(&self) -> impl Iterator<Item = &Manifest> {
        self.manifests.iter().filter(|m| m.kind.is_workload())
    }

    /// Write every manifest into `dir`, creating it if needed.
    ///
    /// Existing files with the same names are overwritten; other files in
    /// `dir` are left alone.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory or a file cannot be written.
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.manifests.len());
        for manifest in &self.manifests {
            let path = dir.join(&manifest.file_name);
            std::fs::write(&path, &manifest.yaml)?;
            debug!(path = %path.display(), kind = %manifest.kind, "wrote manifest");
            written.push(path);
        }

        Ok(written)
    }
}

/// Labels shared by every object kubify renders.
fn common_labels(plan: &Plan) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app.kubernetes.io/managed-by".to_string(), MANAGED_BY.to_string()),
        (
            "app.kubernetes.io/part-of".to_string(),
            plan.namespace.to_string(),
        ),
    ])
}

/// Selector labels for one app.
fn app_labels(app: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), app.to_string())])
}

/// Metadata for a namespaced object.
fn metadata(plan: &Plan, name: &str, app: Option<&str>) -> ObjectMeta {
    let mut labels = common_labels(plan);
    if let Some(app) = app {
        labels.extend(app_labels(app));
    }

    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(plan.namespace.to_string()),
        labels: Some(labels),
        ..ObjectMeta::default()
    }
}
