//! Shared pipeline for `generate` and `deploy`.
//!
//! Merges flags, `.kubify.toml`, prompts and defaults (in that order of
//! precedence), then runs scan, classify, derive and render.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::ProjectArgs;
use crate::core::classify::{self, Classified};
use crate::core::config::{ProjectConfig, ProjectSection};
use crate::core::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_PVC_SIZE, DEFAULT_REPLICAS};
use crate::core::domain::{ImageTag, Namespace};
use crate::core::manifest::ManifestSet;
use crate::core::outcome::Warning;
use crate::core::plan::{Inputs, Plan};
use crate::core::scan::{ScanResult, Scanner};
use crate::core::source::RepositoryUrl;
use crate::error::{Result, ScanError};

/// Everything produced before manifests hit the disk
#[derive(Debug)]
pub struct Prepared {
    pub root: PathBuf,
    pub output_dir: PathBuf,
    pub config: ProjectSection,
    pub plan: Plan,
    pub manifests: ManifestSet,
}

/// Project root, cloning `--repo` into `path` first when given.
///
/// The root is canonicalized so `.` still yields a directory name for the
/// default namespace.
pub fn resolve_root(args: &ProjectArgs) -> Result<PathBuf> {
    let root = match &args.repo {
        Some(raw) => {
            let url = RepositoryUrl::parse(raw)?;
            std::fs::create_dir_all(&args.path)?;
            output::step(&format!("cloning {}", output::path(&url)));
            url.fetch(&args.path)?
        }
        None => args.path.clone(),
    };

    root.canonicalize()
        .map_err(|_| ScanError::RootNotFound(root).into())
}

/// Load `.kubify.toml` from `root`, empty when absent.
pub fn load_config(root: &Path) -> Result<ProjectSection> {
    Ok(ProjectConfig::load(root)?
        .map(|config| config.project)
        .unwrap_or_default())
}

/// Output directory for a root; relative paths are taken from the root.
pub fn output_dir(root: &Path, flag: Option<&Path>, config: &ProjectSection) -> PathBuf {
    let output = flag
        .map(Path::to_path_buf)
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    root.join(output)
}

/// Scan a root, never descending into the manifest output directory.
pub fn scan(root: &Path, output_dir: &Path) -> Result<ScanResult> {
    Scanner::new().exclude(output_dir).scan(root)
}

/// Run everything up to rendering.
pub fn prepare(args: &ProjectArgs, prompter: Prompter) -> Result<Prepared> {
    let root = resolve_root(args)?;
    let config = load_config(&root)?;
    let output_dir = output_dir(&root, args.output.as_deref(), &config);

    let scan = scan(&root, &output_dir)?;
    let vars = classify::classify_variables(&scan.env_files)?;
    let inputs = inputs(args, &config, &scan, &vars, prompter)?;

    let plan = Plan::derive(&scan, vars, inputs)?;
    let manifests = ManifestSet::render(&plan)?;
    info!(namespace = %plan.namespace, manifests = manifests.len(), "prepared");

    Ok(Prepared {
        root,
        output_dir,
        config,
        plan,
        manifests,
    })
}

fn inputs(
    args: &ProjectArgs,
    config: &ProjectSection,
    scan: &ScanResult,
    vars: &Classified,
    prompter: Prompter,
) -> Result<Inputs> {
    let policy = args.db_policy.or(config.db_policy).unwrap_or_default();

    let tag = match &args.tag {
        Some(raw) => ImageTag::new(raw)?,
        None if prompter.is_interactive() => {
            let default = ImageTag::timestamp();
            ImageTag::new(&prompter.text("Image tag", default.as_str())?)?
        }
        None => ImageTag::timestamp(),
    };

    let namespace = match args.namespace.clone().or_else(|| config.namespace.clone()) {
        Some(ns) => Some(ns),
        None if prompter.is_interactive() => {
            let dir_name = scan
                .root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let default = Namespace::sanitize(&dir_name);
            Some(prompter.text("Namespace", default.as_str())?)
        }
        None => None,
    };

    let pvc_size = match args.pvc_size.clone().or_else(|| config.pvc_size.clone()) {
        Some(size) => Some(size),
        None if policy.requests_database(scan, vars) && prompter.is_interactive() => {
            Some(prompter.text("Database volume size", DEFAULT_PVC_SIZE)?)
        }
        None => None,
    };

    let host = match args.host.clone().or_else(|| config.host.clone()) {
        Some(host) => Some(host),
        None => prompter.optional("Ingress host")?,
    };

    let mut inputs = Inputs::new(tag);
    inputs.namespace = namespace;
    inputs.pvc_size = pvc_size;
    inputs.host = host;
    inputs.replicas = args
        .replicas
        .or(config.replicas)
        .unwrap_or(DEFAULT_REPLICAS);
    inputs.policy = policy;

    debug!(?inputs, "resolved inputs");
    Ok(inputs)
}

/// Print warnings, one per line.
pub fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        output::warn(&warning.to_string());
    }
}
