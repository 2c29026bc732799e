//! Deploy command.
//!
//! Generates manifests, then builds, loads and applies them through the
//! local `docker`, `kind` and `kubectl` binaries.

use crate::cli::prompt::Prompter;
use crate::cli::{output, project, ProjectArgs};
use crate::core::constants::DEFAULT_CLUSTER;
use crate::core::deploy::{CommandToolchain, DeployOptions, Deployer, Event};
use crate::core::outcome::Outcome;
use crate::error::Result;

fn print_event(event: Event) {
    match event {
        Event::Building { image } => output::step(&format!("building {image}")),
        Event::Loading { image, cluster } => {
            output::step(&format!("loading {image} into {cluster}"))
        }
        Event::NamespaceExists { namespace } => {
            output::step(&format!("namespace {namespace} already exists"))
        }
        Event::Applying { file } => output::step(&format!("applying {file}")),
        Event::Waiting { kind, name } => {
            output::step(&format!("waiting for {} {name}", kind.resource()))
        }
        Event::Ready { kind, name } => output::success(&format!("{} {name} ready", kind.resource())),
        Event::Status(listing) => {
            output::section("Resources");
            print!("{listing}");
        }
    }
}

/// Generate and deploy.
pub fn execute(
    args: &ProjectArgs,
    cluster: Option<String>,
    skip_build: bool,
    skip_wait: bool,
    yes: bool,
) -> Result<()> {
    let prepared = project::prepare(args, Prompter::new(yes))?;

    let written = prepared.manifests.write(&prepared.output_dir)?;
    output::success(&format!(
        "wrote {} manifests to {}",
        written.len(),
        output::path(prepared.output_dir.display())
    ));

    let options = DeployOptions {
        cluster: cluster
            .or_else(|| prepared.config.cluster.clone())
            .unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
        skip_build,
        skip_wait,
    };

    output::section(&format!("Deploying to {}", prepared.plan.namespace));
    let deployer = Deployer::new(CommandToolchain::new());
    let outcome = deployer.deploy(
        &prepared.plan,
        &prepared.manifests,
        &prepared.output_dir,
        &options,
        &mut print_event,
    );

    match outcome {
        Outcome::Aborted(e) => Err(e),
        Outcome::Completed => {
            println!();
            output::success(&format!("deployed {}", prepared.plan.namespace));
            Ok(())
        }
        Outcome::CompletedWithWarnings(warnings) => {
            println!();
            project::report_warnings(&warnings);
            output::success(&format!(
                "deployed {} with {} warning{}",
                prepared.plan.namespace,
                warnings.len(),
                if warnings.len() == 1 { "" } else { "s" }
            ));
            output::hint(&format!(
                "inspect with {}",
                output::cmd(&format!("kubectl get pods -n {}", prepared.plan.namespace))
            ));
            Ok(())
        }
    }
}
