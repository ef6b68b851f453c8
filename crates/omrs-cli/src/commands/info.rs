//! Implementation of the `omrs info` command.

use omrs_core::application::ServerService;
use omrs_core::domain::ServerConfig;

use crate::{
    cli::{GlobalArgs, ServerArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompter,
};

pub fn execute(
    args: ServerArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = ServerService::new(super::store(&config), prompter::select(&global));
    let server = service.info(args.server_id.as_deref())?;

    if output.is_json() {
        return output.json(&server);
    }
    render(&server, &output)?;
    Ok(())
}

fn render(server: &ServerConfig, output: &OutputManager) -> std::io::Result<()> {
    output.header(&format!("Server {}", server.server_id))?;

    let distribution = server
        .distribution
        .as_ref()
        .map_or_else(|| "(none)".to_string(), ToString::to_string);
    output.field("Distribution:", &distribution)?;
    output.field(
        "Platform:",
        server.platform_version.as_deref().unwrap_or("(none)"),
    )?;
    output.field("Database:", &server.database.driver.to_string())?;
    output.field("Database URI:", &server.database.uri)?;
    output.field("Database user:", &server.database.user)?;
    output.field(
        "Demo data:",
        if server.include_demo_data { "yes" } else { "no" },
    )?;

    let modules: Vec<_> = server.modules().collect();
    if !modules.is_empty() {
        output.print("")?;
        output.header("Modules")?;
        for module in modules {
            output.print(&format!("  {} {}", module.artifact_id, module.version))?;
        }
    }

    if !server.watched_projects.is_empty() {
        output.print("")?;
        output.header("Watched projects")?;
        for project in &server.watched_projects {
            output.print(&format!(
                "  {}:{} ({})",
                project.group_id,
                project.artifact_id,
                project.path.display()
            ))?;
        }
    }
    Ok(())
}
