//! Implementation of the `omrs create-project` command.
//!
//! Collects the module description and hands generation to Maven's
//! archetype plugin.

use tracing::{info, instrument};

use omrs_adapters::MavenArchetypeRunner;
use omrs_core::application::ProjectService;

use crate::{
    cli::{CreateProjectArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompter,
};

#[instrument(skip_all, fields(output_dir = %args.output_dir.display()))]
pub fn execute(
    args: CreateProjectArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let output_dir = args.output_dir.clone();
    let service = ProjectService::new(
        Box::new(MavenArchetypeRunner::new()),
        prompter::select(&global),
        config.archetypes.version,
        config.archetypes.catalog,
    );

    let spinner = output.spinner("Generating project...");
    let result = service.create(args.into_request());
    spinner.finish_and_clear();
    let project = result?;

    info!(module_id = %project.module_id, "Project generated");
    output.success(&format!(
        "Created {} '{}' in {}",
        project.kind,
        project.module_name,
        output_dir.join(&project.module_id).display()
    ))?;

    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", output_dir.join(&project.module_id).display()))?;
        output.print("  mvn clean install")?;
        output.print(&format!(
            "  omrs install-module --artifact-id {} --module-version {}",
            project.module_id, project.version
        ))?;
    }
    Ok(())
}
