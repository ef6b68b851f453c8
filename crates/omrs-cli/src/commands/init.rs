//! `omrs init` writes the default configuration file.

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{self, AppConfig},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Write the built-in defaults to the config file.
pub fn execute(args: InitArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let config_path = AppConfig::target_path(global.config.as_ref());

    if config_path.exists() && !args.force {
        return Err(CliError::ConfigExists { path: config_path });
    }

    output.info("Initialising configuration...")?;
    config::write_file(&config_path, &AppConfig::default().to_toml()?)?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display()
    ))?;
    Ok(())
}
