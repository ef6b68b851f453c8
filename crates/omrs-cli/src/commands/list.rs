//! Implementation of the `omrs list` command.

use omrs_core::application::ServerService;

use crate::{
    cli::GlobalArgs, config::AppConfig, error::CliResult, output::OutputManager, prompter,
};

/// Servers, most recently modified first.
pub fn execute(global: GlobalArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = ServerService::new(super::store(&config), prompter::select(&global));
    let servers = service.list()?;

    if output.is_json() {
        return output.json(&servers);
    }

    if servers.is_empty() {
        output.info(&format!(
            "No servers in {}. Create one with: omrs setup",
            config.sdk.servers_path.display()
        ))?;
        return Ok(());
    }

    output.header("Servers:")?;
    for server in &servers {
        let version = match (&server.distribution, &server.platform_version) {
            (Some(distribution), _) => distribution.to_string(),
            (None, Some(platform)) => format!("platform {platform}"),
            (None, None) => "(empty)".to_string(),
        };
        output.print(&format!("  {:<20} {version}", server.server_id))?;
    }
    Ok(())
}
