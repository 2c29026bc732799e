//! Command-line interface.

pub mod completions;
pub mod deploy;
pub mod generate;
pub mod output;
pub mod project;
pub mod prompt;
pub mod scan;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::plan::DatabasePolicy;

/// Kubify - Kubernetes manifests from a Dockerfile project.
#[derive(Parser)]
#[command(
    name = "kubify",
    about = "Generate Kubernetes manifests from Dockerfiles and .env files",
    version,
    after_help = "Set KUBIFY_LOG=kubify=trace for detailed logs."
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Never prompt; use flags, .kubify.toml and defaults
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Show discovered Dockerfiles, roles and variable classes
    Scan {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write manifests to the output directory
    Generate(ProjectArgs),

    /// Generate, build images, load them into kind and apply
    Deploy {
        #[command(flatten)]
        project: ProjectArgs,
        /// kind cluster to load images into
        #[arg(long)]
        cluster: Option<String>,
        /// Do not build or load images
        #[arg(long)]
        skip_build: bool,
        /// Do not wait for workloads to become ready
        #[arg(long)]
        skip_wait: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by `generate` and `deploy`.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Kubernetes namespace (default: project directory name)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Storage request for the managed database, e.g. 10Gi
    #[arg(long)]
    pub pvc_size: Option<String>,

    /// Ingress host; no Ingress is rendered without one
    #[arg(long)]
    pub host: Option<String>,

    /// Image tag (default: UTC timestamp)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Replicas per service Deployment
    #[arg(long)]
    pub replicas: Option<i32>,

    /// When to provision a database
    #[arg(long, value_parser = parse_policy)]
    pub db_policy: Option<DatabasePolicy>,

    /// Output directory, relative to the project directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Clone this GitHub repository into PATH and use it as the project
    #[arg(long)]
    pub repo: Option<String>,
}

fn parse_policy(raw: &str) -> Result<DatabasePolicy, String> {
    raw.parse().map_err(|e: crate::error::ConfigError| e.to_string())
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
///
/// Warnings are printed by the command itself; only fatal conditions
/// return an error.
pub fn execute(command: Command, yes: bool) -> crate::error::Result<()> {
    match command {
        Command::Scan { path, json } => scan::execute(&path, json),
        Command::Generate(args) => generate::execute(&args, yes),
        Command::Deploy {
            project,
            cluster,
            skip_build,
            skip_wait,
        } => deploy::execute(&project, cluster, skip_build, skip_wait, yes),
        Command::Completions { shell } => completions::execute(shell),
    }
}
