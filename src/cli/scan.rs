//! Scan command.
//!
//! Shows what kubify would work from without writing anything. Secret
//! values are never printed, only their keys.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::{output, project};
use crate::core::classify::{self, Classified};
use crate::core::dockerfile;
use crate::core::domain::Role;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct DockerfileEntry {
    path: PathBuf,
    #[serde(flatten)]
    role: Role,
    /// First EXPOSE port; `None` falls back to the role default
    port: Option<u16>,
}

#[derive(Debug, Serialize)]
struct Report {
    root: PathBuf,
    dockerfiles: Vec<DockerfileEntry>,
    env_files: Vec<PathBuf>,
    sql_files: Vec<PathBuf>,
    init_sql: Option<PathBuf>,
    config_keys: Vec<String>,
    secret_keys: Vec<String>,
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn build_report(root: &Path) -> Result<Report> {
    let settings = project::load_config(root)?;
    let output_dir = project::output_dir(root, None, &settings);
    let scan = project::scan(root, &output_dir)?;
    let Classified { config, secret } = classify::classify_variables(&scan.env_files)?;

    let mut dockerfiles = Vec::with_capacity(scan.dockerfiles.len());
    for path in &scan.dockerfiles {
        let content = classify::read_dockerfile(path)?;
        dockerfiles.push(DockerfileEntry {
            path: relative(root, path),
            role: classify::role_for(&content, &classify::directory_name(path)),
            port: dockerfile::first_exposed_port(&content),
        });
    }

    let relative_all =
        |paths: &[PathBuf]| -> Vec<PathBuf> { paths.iter().map(|p| relative(root, p)).collect() };

    Ok(Report {
        root: root.to_path_buf(),
        dockerfiles,
        env_files: relative_all(&scan.env_files),
        sql_files: relative_all(&scan.sql_files),
        init_sql: scan.init_sql().map(|p| relative(root, p)),
        config_keys: config.into_keys().collect(),
        secret_keys: secret.into_keys().collect(),
    })
}

/// Scan a project directory and print the findings.
pub fn execute(path: &Path, json: bool) -> Result<()> {
    let root = path
        .canonicalize()
        .map_err(|_| crate::error::ScanError::RootNotFound(path.to_path_buf()))?;
    let report = build_report(&root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::header(&format!("Scanned {}", output::path(root.display())));

    output::section("Dockerfiles");
    if report.dockerfiles.is_empty() {
        output::warn("no Dockerfiles found; generate and deploy need at least one");
    }
    for entry in &report.dockerfiles {
        let port = match entry.port {
            Some(port) => port.to_string(),
            None => format!("{} (default)", entry.role.default_port()),
        };
        output::kv(
            &entry.path.display().to_string(),
            format!("{}, port {}", entry.role, port),
        );
    }

    output::section("Variables");
    if report.config_keys.is_empty() && report.secret_keys.is_empty() {
        output::dimmed("no .env files found");
    }
    for key in &report.config_keys {
        output::list_item(&format!("{} (config)", output::key(key)));
    }
    for key in &report.secret_keys {
        output::list_item(&format!("{} (secret)", output::key(key)));
    }

    output::section("Database");
    match &report.init_sql {
        Some(path) => output::kv("init.sql", path.display()),
        None => output::dimmed("no init.sql found"),
    }

    println!();
    output::hint(&format!(
        "run {} to write manifests",
        output::cmd("kubify generate")
    ));

    Ok(())
}
