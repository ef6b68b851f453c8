//! Project generation through `mvn archetype:generate`.

use std::ffi::OsString;
use std::process::Command;

use omrs_core::{
    application::{ApplicationError, ports::ArchetypeRunner},
    domain::ArchetypeRequest,
    error::SdkResult,
};
use tracing::{debug, error, info, instrument};

use crate::error::AdapterError;

const DEFAULT_MVN: &str = "mvn";

/// Runs the Maven archetype plugin in batch mode inside the output
/// directory.
#[derive(Debug, Clone)]
pub struct MavenArchetypeRunner {
    program: OsString,
}

impl MavenArchetypeRunner {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_MVN)
    }

    /// Use another Maven executable, e.g. a wrapper script.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command line arguments for `request`, without the program.
    pub fn arguments(request: &ArchetypeRequest) -> Vec<String> {
        let mut args = vec![
            "-B".to_string(),
            "archetype:generate".to_string(),
            format!("-DarchetypeGroupId={}", request.archetype_group_id),
            format!("-DarchetypeArtifactId={}", request.archetype_artifact_id),
            format!("-DarchetypeVersion={}", request.archetype_version),
        ];
        if let Some(catalog) = &request.catalog {
            args.push(format!("-DarchetypeCatalog={catalog}"));
        }
        args.push("-DinteractiveMode=false".to_string());
        args.extend(
            request
                .properties
                .iter()
                .map(|(key, value)| format!("-D{key}={value}")),
        );
        args
    }
}

impl Default for MavenArchetypeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchetypeRunner for MavenArchetypeRunner {
    #[instrument(skip_all, fields(archetype = %request.archetype_artifact_id, dir = %request.output_dir.display()))]
    fn generate(&self, request: &ArchetypeRequest) -> SdkResult<()> {
        std::fs::create_dir_all(&request.output_dir)
            .map_err(|e| AdapterError::io("create directory", &request.output_dir, e))?;

        let args = Self::arguments(request);
        debug!(?args, "Running archetype generation");

        let command = self.program.to_string_lossy().into_owned();
        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(&request.output_dir)
            .status();

        match status {
            Ok(s) if s.success() => {
                info!(status = ?s, "Archetype generated");
                Ok(())
            }
            Ok(s) => {
                error!(%command, "Archetype generation exited with {s}");
                Err(ApplicationError::ExternalCommandFailed {
                    command,
                    reason: format!("exited with {s}"),
                }
                .into())
            }
            Err(e) => {
                error!(%command, error = %e, "Could not start archetype generation");
                Err(ApplicationError::ExternalCommandFailed {
                    command,
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }
}
