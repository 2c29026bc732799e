//! Derive phase.
//!
//! Turns scan results, classified variables and user inputs into a fully
//! resolved [`Plan`]. Every cross-cutting override (database host rewrite,
//! defaults, naming) happens here, so rendering only ever reads immutable
//! inputs.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::classify::{self, Classified};
use crate::core::constants::{
    DATABASE_HOST_KEYS, DATABASE_NAME_KEYS, DATABASE_PASSWORD_KEYS, DATABASE_SERVICE,
    DATABASE_USER_KEYS, DEFAULT_DATABASE_NAME, DEFAULT_DATABASE_PASSWORD, DEFAULT_DATABASE_USER,
    DEFAULT_REPLICAS,
};
use crate::core::dockerfile;
use crate::core::domain::{ImageTag, Namespace, PortSource, PvcSize, Role, ServiceDescriptor};
use crate::core::outcome::Warning;
use crate::core::scan::ScanResult;
use crate::error::{ConfigError, Result, ScanError};

/// When kubify provisions a database itself.
///
/// Two historical behaviors exist and disagree; the caller picks one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatabasePolicy {
    /// Managed database iff the env defines `DATABASE_HOST`.
    /// Rendered as PVC + Deployment + Service.
    #[default]
    #[serde(alias = "managed-db-by-explicit-host")]
    ExplicitHost,
    /// Managed database iff no `init.sql` exists; an `init.sql` means an
    /// external database. Rendered as StatefulSet + headless Service.
    #[serde(alias = "managed-db-by-absence")]
    Absence,
}

impl DatabasePolicy {
    /// Whether this policy asks for a managed database.
    pub fn requests_database(&self, scan: &ScanResult, vars: &Classified) -> bool {
        match self {
            Self::ExplicitHost => vars.contains("DATABASE_HOST"),
            Self::Absence => !scan.has_init_sql(),
        }
    }

    /// Workload kind used for the managed database.
    pub fn workload(&self) -> DatabaseWorkload {
        match self {
            Self::ExplicitHost => DatabaseWorkload::Deployment,
            Self::Absence => DatabaseWorkload::StatefulSet,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExplicitHost => "explicit-host",
            Self::Absence => "absence",
        }
    }
}

impl FromStr for DatabasePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "explicit-host" | "managed-db-by-explicit-host" => Ok(Self::ExplicitHost),
            "absence" | "managed-db-by-absence" => Ok(Self::Absence),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for DatabasePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseWorkload {
    Deployment,
    StatefulSet,
}

/// Where a database container env var takes its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    ConfigMap(String),
    Secret(String),
    Literal(String),
}

/// Resolved managed database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePlan {
    pub workload: DatabaseWorkload,
    pub service: String,
    /// In-cluster DNS name written into the host variables
    pub host: String,
    pub pvc_size: PvcSize,
    pub user: ValueSource,
    pub password: ValueSource,
    pub name: ValueSource,
    /// Contents of `init.sql`, shipped in a ConfigMap when present
    pub init_sql: Option<String>,
}

/// Raw inputs from flags, project config and prompts
#[derive(Debug, Clone)]
pub struct Inputs {
    /// Namespace as typed; `None` derives it from the project directory
    pub namespace: Option<String>,
    pub pvc_size: Option<String>,
    pub host: Option<String>,
    pub tag: ImageTag,
    pub replicas: i32,
    pub policy: DatabasePolicy,
}

impl Inputs {
    pub fn new(tag: ImageTag) -> Self {
        Self {
            namespace: None,
            pvc_size: None,
            host: None,
            tag,
            replicas: DEFAULT_REPLICAS,
            policy: DatabasePolicy::default(),
        }
    }
}

/// Fully resolved input to rendering
#[derive(Debug, Clone)]
pub struct Plan {
    pub namespace: Namespace,
    pub services: Vec<ServiceDescriptor>,
    pub config: BTreeMap<String, String>,
    pub secret: BTreeMap<String, String>,
    pub database: Option<DatabasePlan>,
    pub host: Option<String>,
    pub replicas: i32,
    pub tag: ImageTag,
    pub warnings: Vec<Warning>,
}

impl Plan {
    /// Resolve a plan.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::NoDockerfiles` when nothing can be built,
    /// `ConfigError::InvalidReplicas` for a replica count below one, and
    /// `ScanError::ReadFile` if a Dockerfile or `init.sql` cannot be read.
    pub fn derive(scan: &ScanResult, vars: Classified, inputs: Inputs) -> Result<Self> {
        if scan.dockerfiles.is_empty() {
            return Err(ScanError::NoDockerfiles(scan.root.clone()).into());
        }
        if inputs.replicas < 1 {
            return Err(ConfigError::InvalidReplicas(inputs.replicas).into());
        }

        let mut warnings = Vec::new();
        let namespace = resolve_namespace(&scan.root, inputs.namespace.as_deref(), &mut warnings);
        let wants_database = inputs.policy.requests_database(scan, &vars);
        let services = resolve_services(
            &scan.dockerfiles,
            &namespace,
            &inputs.tag,
            wants_database,
            &mut warnings,
        )?;

        let Classified {
            mut config,
            mut secret,
        } = vars;

        let database = if wants_database {
            let pvc_size = resolve_pvc_size(inputs.pvc_size.as_deref(), &mut warnings);
            let init_sql = scan.init_sql().map(read_sql).transpose()?;
            let database = resolve_database(
                &namespace,
                inputs.policy,
                pvc_size,
                &config,
                &secret,
                init_sql,
                &mut warnings,
            );
            override_database_host(&mut config, &database.host);
            if let ValueSource::Secret(key) = &database.password {
                secret
                    .entry(key.clone())
                    .or_insert_with(|| DEFAULT_DATABASE_PASSWORD.to_string());
            }
            info!(host = %database.host, "managed database requested");
            Some(database)
        } else {
            None
        };

        let host = inputs
            .host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        debug!(
            namespace = %namespace,
            services = services.len(),
            database = database.is_some(),
            warnings = warnings.len(),
            "plan derived"
        );

        Ok(Self {
            namespace,
            services,
            config,
            secret,
            database,
            host,
            replicas: inputs.replicas,
            tag: inputs.tag,
            warnings,
        })
    }

    /// Name of the generated ConfigMap.
    pub fn config_map_name(&self) -> String {
        format!("{}-config", self.namespace)
    }

    /// Name of the generated Secret.
    pub fn secret_name(&self) -> String {
        format!("{}-secret", self.namespace)
    }

    pub fn has_config(&self) -> bool {
        !self.config.is_empty()
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Service by role, first match.
    pub fn service_with_role(&self, role: &Role) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|svc| svc.role() == role)
    }
}

fn resolve_namespace(root: &Path, input: Option<&str>, warnings: &mut Vec<Warning>) -> Namespace {
    match input {
        Some(raw) => {
            let namespace = Namespace::sanitize(raw);
            if namespace.as_str() != raw {
                warnings.push(Warning::NamespaceAdjusted {
                    input: raw.to_string(),
                    namespace: namespace.to_string(),
                });
            }
            namespace
        }
        None => {
            let dir_name = root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Namespace::sanitize(&dir_name)
        }
    }
}

fn resolve_pvc_size(input: Option<&str>, warnings: &mut Vec<Warning>) -> PvcSize {
    let Some(raw) = input.filter(|raw| !raw.trim().is_empty()) else {
        return PvcSize::default();
    };

    PvcSize::parse(raw).unwrap_or_else(|| {
        let size = PvcSize::default();
        warnings.push(Warning::PvcSizeDefaulted {
            input: raw.to_string(),
            size: size.to_string(),
        });
        size
    })
}

fn resolve_services(
    dockerfiles: &[PathBuf],
    namespace: &Namespace,
    tag: &ImageTag,
    reserve_database: bool,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<ServiceDescriptor>> {
    let mut taken = HashSet::new();
    if reserve_database {
        taken.insert(DATABASE_SERVICE.to_string());
    }
    let mut services = Vec::with_capacity(dockerfiles.len());

    for path in dockerfiles {
        let content = classify::read_dockerfile(path)?;
        let dir_name = classify::directory_name(path);
        let role = classify::role_for(&content, &dir_name);
        let name = unique_name(&role, &dir_name, &mut taken);

        let (port, port_source) = match dockerfile::first_exposed_port(&content) {
            Some(port) => (port, PortSource::Expose),
            None => {
                let port = role.default_port();
                warnings.push(Warning::PortDefaulted {
                    service: name.clone(),
                    port,
                });
                (port, PortSource::Default)
            }
        };

        let image = format!("{namespace}-{name}:{tag}");
        debug!(path = %path.display(), %role, %name, port, "classified dockerfile");
        services.push(ServiceDescriptor::new(
            role,
            name,
            path.clone(),
            port,
            port_source,
            image,
        ));
    }

    Ok(services)
}

/// Workload name for a role, unique among `taken`.
///
/// Tries the role's base name, then `<base>-<dir>`, then numeric suffixes.
fn unique_name(role: &Role, dir_name: &str, taken: &mut HashSet<String>) -> String {
    let sanitize = |raw: &str| Namespace::try_sanitize(raw).map(|n| n.to_string());

    let base = sanitize(role.base_name()).unwrap_or_else(|| "app".to_string());
    let mut candidates = vec![base.clone()];
    if let Some(dir) = sanitize(dir_name).filter(|dir| *dir != base) {
        candidates.push(format!("{base}-{dir}"));
    }

    let name = candidates
        .into_iter()
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| {
            let mut n = 2;
            loop {
                let candidate = format!("{base}-{n}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            }
        });

    taken.insert(name.clone());
    name
}

fn resolve_database(
    namespace: &Namespace,
    policy: DatabasePolicy,
    pvc_size: PvcSize,
    config: &BTreeMap<String, String>,
    secret: &BTreeMap<String, String>,
    init_sql: Option<String>,
    warnings: &mut Vec<Warning>,
) -> DatabasePlan {
    let lookup = |keys: &[&str]| {
        keys.iter().find_map(|key| {
            if secret.contains_key(*key) {
                Some(ValueSource::Secret(key.to_string()))
            } else if config.contains_key(*key) {
                Some(ValueSource::ConfigMap(key.to_string()))
            } else {
                None
            }
        })
    };

    let user = lookup(DATABASE_USER_KEYS)
        .unwrap_or_else(|| ValueSource::Literal(DEFAULT_DATABASE_USER.to_string()));
    let name = lookup(DATABASE_NAME_KEYS)
        .unwrap_or_else(|| ValueSource::Literal(DEFAULT_DATABASE_NAME.to_string()));
    let password = lookup(DATABASE_PASSWORD_KEYS).unwrap_or_else(|| {
        let key = DATABASE_PASSWORD_KEYS[1].to_string();
        warnings.push(Warning::MissingDatabasePassword { key: key.clone() });
        ValueSource::Secret(key)
    });

    DatabasePlan {
        workload: policy.workload(),
        service: DATABASE_SERVICE.to_string(),
        host: format!("{DATABASE_SERVICE}.{namespace}.svc.cluster.local"),
        pvc_size,
        user,
        password,
        name,
        init_sql,
    }
}

/// Point every database host key at the managed database.
///
/// Inserts `DATABASE_HOST` when no host key exists.
fn override_database_host(config: &mut BTreeMap<String, String>, host: &str) {
    let mut found = false;
    for key in DATABASE_HOST_KEYS {
        if let Some(value) = config.get_mut(*key) {
            *value = host.to_string();
            found = true;
        }
    }
    if !found {
        config.insert(DATABASE_HOST_KEYS[0].to_string(), host.to_string());
    }
}

fn read_sql(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|source| ScanError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content)
}
