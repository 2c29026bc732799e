//! Generate command.

use crate::cli::prompt::Prompter;
use crate::cli::{output, project, ProjectArgs};
use crate::core::outcome::Outcome;
use crate::error::Result;

/// Render manifests and write them to the output directory.
pub fn execute(args: &ProjectArgs, yes: bool) -> Result<()> {
    let prepared = project::prepare(args, Prompter::new(yes))?;
    let written = prepared.manifests.write(&prepared.output_dir)?;

    let plan = &prepared.plan;
    output::section("Manifests");
    output::kv("namespace", &plan.namespace);
    output::kv("tag", &plan.tag);
    for svc in &plan.services {
        output::kv(svc.name(), format!("{} on port {}", svc.role(), svc.port()));
    }
    if let Some(db) = &plan.database {
        output::kv(&db.service, format!("managed database at {}", db.host));
    }
    if let Some(host) = &plan.host {
        output::kv("ingress", host);
    }
    println!();

    let outcome = Outcome::from_warnings(plan.warnings.clone());
    project::report_warnings(outcome.warnings());

    output::success(&format!(
        "wrote {} manifests to {}",
        written.len(),
        output::path(prepared.output_dir.display())
    ));
    output::hint(&format!(
        "apply with {} or {}",
        output::cmd(&format!(
            "kubectl apply -f {}",
            prepared.output_dir.display()
        )),
        output::cmd("kubify deploy")
    ));

    Ok(())
}
