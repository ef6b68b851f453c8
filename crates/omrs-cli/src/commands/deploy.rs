//! Implementation of the `omrs deploy` command.
//!
//! The service prints the planned changes and asks before touching files;
//! a declined upgrade exits as cancelled.

use serde::Serialize;
use tracing::instrument;

use omrs_core::application::{DeployOutcome, DeployService};

use crate::{
    cli::{DeployArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompter,
};

/// JSON shape of a deploy run.
#[derive(Serialize)]
struct Report<'a> {
    server_id: &'a str,
    changes: &'a [String],
}

#[instrument(skip_all, fields(server_id = ?args.server_id))]
pub fn execute(
    args: DeployArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = DeployService::new(
        super::store(&config),
        super::repository(&config),
        super::distributions(&config),
        super::filesystem(),
        prompter::select(&global),
        config.sdk.platform_versions.clone(),
    );

    let spinner = output.spinner("Deploying...");
    let result = service.deploy(args.into_request());
    spinner.finish_and_clear();

    match result? {
        // The prompter has already shown the changes, or that there are none.
        DeployOutcome::NothingToUpgrade => {
            if output.is_json() {
                return output.json(&Vec::<String>::new());
            }
        }
        DeployOutcome::Declined => {
            output.warning("Upgrade declined")?;
            return Err(CliError::Cancelled);
        }
        DeployOutcome::Applied { server, changes } => {
            if output.is_json() {
                return output.json(&Report {
                    server_id: &server.server_id,
                    changes: &changes,
                });
            }
            output.success(&format!(
                "Server '{}' upgraded ({} change{})",
                server.server_id,
                changes.len(),
                if changes.len() == 1 { "" } else { "s" }
            ))?;
        }
    }
    Ok(())
}
