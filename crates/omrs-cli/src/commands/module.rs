//! `omrs install-module` and `omrs uninstall-module`.

use tracing::instrument;

use omrs_core::application::{ModuleInstallOutcome, ModuleService};

use crate::{
    cli::{GlobalArgs, InstallModuleArgs, UninstallModuleArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompter,
};

fn service(global: &GlobalArgs, config: &AppConfig) -> ModuleService {
    ModuleService::new(
        super::store(config),
        super::repository(config),
        super::filesystem(),
        prompter::select(global),
    )
}

#[instrument(skip_all, fields(server_id = ?args.server_id, artifact_id = ?args.artifact_id))]
pub fn install(
    args: InstallModuleArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = service(&global, &config);

    let spinner = output.spinner("Installing module...");
    let result = service.install(args.into_request());
    spinner.finish_and_clear();

    let (artifact, message) = match result? {
        ModuleInstallOutcome::Installed(artifact) => {
            let message = format!("Installed {} {}", artifact.artifact_id, artifact.version);
            (artifact, message)
        }
        ModuleInstallOutcome::Updated { artifact, from } => {
            let message = format!(
                "Updated {} from {from} to {}",
                artifact.artifact_id, artifact.version
            );
            (artifact, message)
        }
    };

    if output.is_json() {
        return output.json(&artifact);
    }
    output.success(&message)?;
    Ok(())
}

#[instrument(skip_all, fields(server_id = ?args.server_id, artifact_id = ?args.artifact_id))]
pub fn uninstall(
    args: UninstallModuleArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let removed = service(&global, &config)
        .uninstall(args.server_id.as_deref(), args.artifact_id.as_deref())?;

    if output.is_json() {
        return output.json(&removed);
    }
    output.success(&format!(
        "Removed {} {}",
        removed.artifact_id, removed.version
    ))?;
    Ok(())
}
