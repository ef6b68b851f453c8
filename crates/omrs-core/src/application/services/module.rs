//! Module install/uninstall on an existing server.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::application::{
    ApplicationError,
    ports::{ArtifactRepository, Filesystem, Prompter, ServerStore},
    services::{installer::Installer, wizard::Wizard},
};
use crate::domain::{Artifact, GROUP_MODULE, MODULES_DIR, with_omod_suffix};
use crate::error::SdkResult;

#[derive(Debug, Clone, Default)]
pub struct ModuleRequest {
    pub server_id: Option<String>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleInstallOutcome {
    Installed(Artifact),
    /// Replaced an installed version.
    Updated { artifact: Artifact, from: String },
}

pub struct ModuleService {
    store: Box<dyn ServerStore>,
    repository: Box<dyn ArtifactRepository>,
    filesystem: Box<dyn Filesystem>,
    prompter: Box<dyn Prompter>,
}

impl ModuleService {
    pub fn new(
        store: Box<dyn ServerStore>,
        repository: Box<dyn ArtifactRepository>,
        filesystem: Box<dyn Filesystem>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            store,
            repository,
            filesystem,
            prompter,
        }
    }

    /// Install a module, replacing older files of the same module.
    #[instrument(skip_all, fields(server_id = ?request.server_id, artifact_id = ?request.artifact_id))]
    pub fn install(&self, request: ModuleRequest) -> SdkResult<ModuleInstallOutcome> {
        let wizard = Wizard::new(self.prompter.as_ref());
        let server_id =
            wizard.existing_server_or_prompt(request.server_id.as_deref(), self.store.as_ref())?;
        let group_id = wizard.value_or_prompt(
            request.group_id.as_deref(),
            "Specify module groupId",
            Some(GROUP_MODULE),
        )?;
        let artifact_id = wizard.value_or_prompt(
            request.artifact_id.as_deref(),
            "Specify module artifactId",
            None,
        )?;
        let version =
            wizard.value_or_prompt(request.version.as_deref(), "Specify module version", None)?;

        let artifact = Artifact::with_group(with_omod_suffix(&artifact_id), version, group_id);
        let mut server = self.store.load(&server_id)?;
        let modules_dir = self.store.server_dir(&server_id).join(MODULES_DIR);

        Installer::new(self.repository.as_ref(), self.filesystem.as_ref())
            .install_all(&self.store.server_dir(&server_id), &[&artifact])?;
        self.remove_older_files(&modules_dir, &artifact)?;

        let previous = server
            .find_module(&artifact.artifact_id)
            .map(|installed| installed.version.clone());
        server.record_artifact(artifact.clone());
        self.store.save(&server)?;

        Ok(match previous {
            Some(from) => {
                info!(module = %artifact.artifact_id, %from, to = %artifact.version, "Module updated");
                ModuleInstallOutcome::Updated { artifact, from }
            }
            None => {
                info!(module = %artifact.artifact_id, version = %artifact.version, "Module installed");
                ModuleInstallOutcome::Installed(artifact)
            }
        })
    }

    /// Remove a module's file and its record.
    #[instrument(skip(self))]
    pub fn uninstall(
        &self,
        server_id: Option<&str>,
        artifact_id: Option<&str>,
    ) -> SdkResult<Artifact> {
        let wizard = Wizard::new(self.prompter.as_ref());
        let server_id = wizard.existing_server_or_prompt(server_id, self.store.as_ref())?;
        let artifact_id = wizard.value_or_prompt(artifact_id, "Specify module artifactId", None)?;

        let mut server = self.store.load(&server_id)?;
        let removed = server
            .remove_module(&artifact_id)
            .or_else(|| server.remove_module(&with_omod_suffix(&artifact_id)))
            .ok_or_else(|| ApplicationError::ModuleNotInstalled {
                server_id: server_id.clone(),
                artifact_id: artifact_id.clone(),
            })?;

        Installer::new(self.repository.as_ref(), self.filesystem.as_ref())
            .remove(&self.store.server_dir(&server_id), &removed)?;
        self.store.save(&server)?;

        info!(module = %removed.artifact_id, "Module uninstalled");
        Ok(removed)
    }

    /// Remove `{base_id}-*.omod` files other than the one just installed.
    fn remove_older_files(&self, modules_dir: &Path, artifact: &Artifact) -> SdkResult<()> {
        let prefix = format!("{}-", artifact.base_id());
        let keep = artifact.dest_file_name();

        for path in self.filesystem.list_dir(modules_dir)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(&prefix) && name.ends_with(".omod") && name != keep {
                debug!(file = %name, "Removing older module file");
                self.filesystem.remove_file(&path)?;
            }
        }
        Ok(())
    }
}
