//! Deploy Service - upgrades an existing server.
//!
//! Planning computes an [`UpgradeDifferential`] from the server's installed
//! artifacts to the desired ones. Applying installs the new files first and
//! only then removes what they replace. A failed install restores any file
//! it had overwritten, so the server is left as it was.

use tracing::{info, instrument};

use crate::application::{
    ports::{ArtifactRepository, DistributionSource, Filesystem, Prompter, ServerStore},
    services::{
        installer::Installer,
        presenter::{self, UpgradeDecision},
        wizard::{InstallTarget, Wizard},
    },
};
use crate::domain::{Artifact, Distribution, DistributionRef, ServerConfig, UpgradeDifferential};
use crate::error::SdkResult;

#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub server_id: Option<String>,
    pub distribution: Option<String>,
    pub platform_version: Option<String>,
    /// Skip the confirmation question.
    pub assume_yes: bool,
}

/// Result of a deploy run.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployOutcome {
    NothingToUpgrade,
    Declined,
    /// Upgrade applied; `changes` are the presented lines.
    Applied {
        server: ServerConfig,
        changes: Vec<String>,
    },
}

pub struct DeployService {
    store: Box<dyn ServerStore>,
    repository: Box<dyn ArtifactRepository>,
    distributions: Box<dyn DistributionSource>,
    filesystem: Box<dyn Filesystem>,
    prompter: Box<dyn Prompter>,
    platform_versions: Vec<String>,
}

impl DeployService {
    pub fn new(
        store: Box<dyn ServerStore>,
        repository: Box<dyn ArtifactRepository>,
        distributions: Box<dyn DistributionSource>,
        filesystem: Box<dyn Filesystem>,
        prompter: Box<dyn Prompter>,
        platform_versions: Vec<String>,
    ) -> Self {
        Self {
            store,
            repository,
            distributions,
            filesystem,
            prompter,
            platform_versions,
        }
    }

    /// Resolve what to deploy, show the changes, ask, and apply.
    #[instrument(skip_all, fields(server_id = ?request.server_id))]
    pub fn deploy(&self, request: DeployRequest) -> SdkResult<DeployOutcome> {
        let wizard = Wizard::new(self.prompter.as_ref());
        let server_id =
            wizard.existing_server_or_prompt(request.server_id.as_deref(), self.store.as_ref())?;

        let target = wizard.install_target_or_prompt(
            request.distribution.as_deref(),
            request.platform_version.as_deref(),
            &self.platform_versions,
        )?;
        let (server, diff, distribution) = match target {
            InstallTarget::Distribution(reference) => {
                let distribution = self.distributions.load(&reference)?;
                let (server, diff) = self.plan_upgrade(&server_id, &distribution)?;
                (server, diff, Some(distribution.reference()))
            }
            InstallTarget::Platform(version) => {
                let (server, diff) = self.plan_platform(&server_id, &version)?;
                (server, diff, None)
            }
        };

        let installed_platform = server.platform_version.clone();
        match presenter::confirm(&wizard, &diff, installed_platform.as_deref(), request.assume_yes)? {
            UpgradeDecision::NothingToUpgrade => Ok(DeployOutcome::NothingToUpgrade),
            UpgradeDecision::Declined => {
                info!("Upgrade declined");
                Ok(DeployOutcome::Declined)
            }
            UpgradeDecision::Confirmed => {
                let changes = presenter::describe(&diff, installed_platform.as_deref());
                let server = self.apply_upgrade(server, &diff, distribution)?;
                Ok(DeployOutcome::Applied { server, changes })
            }
        }
    }

    /// Differential from the server's installed artifacts to `distribution`.
    pub fn plan_upgrade(
        &self,
        server_id: &str,
        distribution: &Distribution,
    ) -> SdkResult<(ServerConfig, UpgradeDifferential)> {
        distribution.validate()?;
        let server = self.store.load(server_id)?;
        let diff = UpgradeDifferential::calculate(&server.artifacts, &distribution.artifacts)?;
        info!(changes = diff.len(), "Upgrade planned");
        Ok((server, diff))
    }

    /// Differential that replaces only the platform web application.
    pub fn plan_platform(
        &self,
        server_id: &str,
        version: &str,
    ) -> SdkResult<(ServerConfig, UpgradeDifferential)> {
        let server = self.store.load(server_id)?;
        let installed: Vec<Artifact> = server.platform().cloned().into_iter().collect();
        let diff = UpgradeDifferential::calculate(&installed, &[Artifact::platform(version)])?;
        Ok((server, diff))
    }

    /// Plan and apply a platform-only upgrade without asking.
    pub fn deploy_platform(&self, server_id: &str, version: &str) -> SdkResult<ServerConfig> {
        let (server, diff) = self.plan_platform(server_id, version)?;
        if diff.is_empty() {
            return Ok(server);
        }
        self.apply_upgrade(server, &diff, None)
    }

    /// Install everything in `diff`, drop the files it replaces, and save.
    #[instrument(skip_all, fields(server_id = %server.server_id, changes = diff.len()))]
    pub fn apply_upgrade(
        &self,
        mut server: ServerConfig,
        diff: &UpgradeDifferential,
        distribution: Option<DistributionRef>,
    ) -> SdkResult<ServerConfig> {
        let server_dir = self.store.server_dir(&server.server_id);
        let installer = Installer::new(self.repository.as_ref(), self.filesystem.as_ref());

        let to_install: Vec<&Artifact> = diff
            .platform_artifact
            .iter()
            .chain(diff.update_old_to_new.iter().map(|(_, new)| new))
            .chain(diff.modules_to_add.iter())
            .collect();
        installer.install_all(&server_dir, &to_install)?;

        let mut superseded: Vec<Artifact> = diff
            .update_old_to_new
            .iter()
            .filter(|(old, new)| old.dest_file_name() != new.dest_file_name())
            .map(|(old, _)| old.clone())
            .collect();
        if let (Some(old), Some(new)) = (server.platform(), &diff.platform_artifact) {
            if old.dest_file_name() != new.dest_file_name() {
                superseded.push(old.clone());
            }
        }
        for old in &superseded {
            installer.remove(&server_dir, old)?;
        }

        for artifact in to_install {
            server.record_artifact(artifact.clone());
        }
        if distribution.is_some() {
            server.distribution = distribution;
        }
        self.store.save(&server)?;

        info!("Upgrade applied");
        Ok(server)
    }
}
