//! Kubify - Kubernetes manifests from a Dockerfile project.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kubify::cli::output;
use kubify::cli::{execute, Cli};
use kubify::core::constants::LOG_ENV;
use kubify::error::{ConfigError, DeployError, Error, ScanError, SourceError};

/// Follow-up hint for errors with an obvious fix.
fn suggestion(e: &Error) -> Option<String> {
    match e {
        Error::Deploy(DeployError::ToolNotFound(tool)) => {
            Some(format!("install {tool} and make sure it is on PATH"))
        }
        Error::Deploy(DeployError::ImageLoad { cluster, .. }) => Some(format!(
            "check the cluster exists: kind get clusters (expected {cluster})"
        )),
        Error::Scan(ScanError::NoDockerfiles(_)) => Some(
            "kubify looks for Dockerfile, Dockerfile.<variant> and <name>.Dockerfile".to_string(),
        ),
        Error::Source(SourceError::InvalidRepositoryUrl(_)) => {
            Some("expected https://github.com/<owner>/<repo> or git@github.com:<owner>/<repo>".to_string())
        }
        Error::Config(ConfigError::Parse(_)) => {
            Some("allowed keys in [project]: namespace, host, pvc_size, replicas, cluster, db_policy, output".to_string())
        }
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("kubify=debug")
        } else {
            EnvFilter::new("kubify=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.yes) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
