//! Implementation of the `omrs setup` command.

use tracing::{info, instrument};

use omrs_core::application::SetupService;
use omrs_core::domain::ServerConfig;

use crate::{
    cli::{GlobalArgs, SetupArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompter,
};

#[instrument(skip_all, fields(server_id = ?args.server_id))]
pub fn execute(
    args: SetupArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = SetupService::new(
        super::store(&config),
        super::repository(&config),
        super::distributions(&config),
        super::filesystem(),
        prompter::select(&global),
        config.sdk.platform_versions.clone(),
    );

    let spinner = output.spinner("Setting up server...");
    let result = service.setup(args.into_request());
    spinner.finish_and_clear();
    let server = result?;

    info!(server_id = %server.server_id, "Setup finished");
    if output.is_json() {
        return output.json(&server);
    }
    let path = config.sdk.servers_path.join(&server.server_id);
    output.success(&format!(
        "Server '{}' created at {}",
        server.server_id,
        path.display()
    ))?;
    print_summary(&server, &output)?;
    Ok(())
}

fn print_summary(server: &ServerConfig, output: &OutputManager) -> std::io::Result<()> {
    if let Some(distribution) = &server.distribution {
        output.field("Distribution:", &distribution.to_string())?;
    }
    if let Some(platform) = &server.platform_version {
        output.field("Platform:", platform)?;
    }
    output.field("Database:", &server.database.driver.to_string())?;
    output.field("Modules:", &server.modules().count().to_string())?;
    Ok(())
}
