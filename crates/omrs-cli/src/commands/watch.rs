//! `omrs watch` and `omrs unwatch`.

use std::path::{Path, PathBuf};

use omrs_core::application::WatchService;
use omrs_core::domain::WatchedProject;

use crate::{
    cli::{GlobalArgs, UnwatchArgs, WatchArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
    prompter,
};

fn service(global: &GlobalArgs, config: &AppConfig) -> WatchService {
    WatchService::new(super::store(config), prompter::select(global))
}

pub fn watch(
    args: WatchArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = service(&global, &config);

    let Some(artifact_id) = args.artifact_id else {
        let projects = service.list(args.server_id.as_deref())?;
        return render(&projects, &output);
    };

    let path = absolute(&args.path)?;
    let project = WatchedProject::new(args.group_id, artifact_id, path);
    let added = service.watch(args.server_id.as_deref(), project.clone())?;

    if output.is_json() {
        return output.json(&project);
    }
    if added {
        output.success(&format!(
            "Watching {} at {}",
            project.artifact_id,
            project.path.display()
        ))?;
    } else {
        output.info(&format!("{} is already watched", project.artifact_id))?;
    }
    Ok(())
}

pub fn unwatch(
    args: UnwatchArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let removed = service(&global, &config).unwatch(args.server_id.as_deref(), &args.selector)?;

    if output.is_json() {
        return output.json(&removed);
    }
    for project in &removed {
        output.success(&format!("Stopped watching {}", project.artifact_id))?;
    }
    Ok(())
}

fn render(projects: &[WatchedProject], output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        return output.json(projects);
    }
    if projects.is_empty() {
        output.info("No watched projects")?;
        return Ok(());
    }
    for project in projects {
        output.print(&format!(
            "  {}:{} ({})",
            project.group_id,
            project.artifact_id,
            project.path.display()
        ))?;
    }
    Ok(())
}

/// Stored paths are absolute so that `unwatch <path>` matches from any
/// directory.
fn absolute(path: &Path) -> CliResult<PathBuf> {
    std::path::absolute(path).with_cli_context(|| format!("Invalid project path '{}'", path.display()))
}
