//! Setup Service - creates a new server directory.
//!
//! Workflow:
//! 1. Resolve a free server id
//! 2. Choose a distribution or a platform version
//! 3. Choose the database and demo data
//! 4. Install artifacts and save `server.toml`
//!
//! Anything written is rolled back when a step fails.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::application::{
    ApplicationError,
    ports::{ArtifactRepository, DistributionSource, Filesystem, Prompter, ServerStore},
    services::{
        installer::Installer,
        wizard::{InstallTarget, Wizard},
    },
};
use crate::domain::{Artifact, DatabaseConfig, MODULES_DIR, ServerConfig};
use crate::error::SdkResult;

/// Options for a new server; anything missing is asked for.
#[derive(Debug, Clone, Default)]
pub struct SetupRequest {
    pub server_id: Option<String>,
    pub distribution: Option<String>,
    pub platform_version: Option<String>,
    pub database: Option<DatabaseConfig>,
    pub include_demo_data: Option<bool>,
}

pub struct SetupService {
    store: Box<dyn ServerStore>,
    repository: Box<dyn ArtifactRepository>,
    distributions: Box<dyn DistributionSource>,
    filesystem: Box<dyn Filesystem>,
    prompter: Box<dyn Prompter>,
    platform_versions: Vec<String>,
}

impl SetupService {
    /// Create a setup service. `platform_versions` are the versions offered
    /// when no distribution or version was given.
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

    /// Set up a new server and return its saved configuration.
    #[instrument(skip_all, fields(server_id = ?request.server_id))]
    pub fn setup(&self, request: SetupRequest) -> SdkResult<ServerConfig> {
        let wizard = Wizard::new(self.prompter.as_ref());

        let server_id = wizard.server_id_or_prompt(request.server_id.as_deref(), self.store.as_ref())?;
        if self.store.exists(&server_id) {
            return Err(ApplicationError::ServerExists { id: server_id }.into());
        }

        let mut server = ServerConfig::new(&server_id);
        let artifacts = match wizard.install_target_or_prompt(
            request.distribution.as_deref(),
            request.platform_version.as_deref(),
            &self.platform_versions,
        )? {
            InstallTarget::Distribution(reference) => {
                let distribution = self.distributions.load(&reference)?;
                distribution.validate()?;
                info!(distribution = %distribution.name, version = %distribution.version, "Using distribution");
                server.distribution = Some(distribution.reference());
                distribution.artifacts
            }
            InstallTarget::Platform(version) => vec![Artifact::platform(version)],
        };

        server.database = wizard.database_or_prompt(request.database)?.resolved();
        server.include_demo_data = match request.include_demo_data {
            Some(flag) => flag,
            None => wizard.yes_no("Would you like to include demo data?")?,
        };

        let server_dir = self.store.server_dir(&server_id);
        match self.create(&server_dir, &mut server, &artifacts) {
            Ok(()) => {
                info!(server_id = %server_id, path = %server_dir.display(), "Server created");
                Ok(server)
            }
            Err(e) => {
                warn!("Setup failed, attempting rollback");
                self.rollback(&server_dir);
                Err(e)
            }
        }
    }

    fn create(
        &self,
        server_dir: &Path,
        server: &mut ServerConfig,
        artifacts: &[Artifact],
    ) -> SdkResult<()> {
        self.filesystem.create_dir_all(&server_dir.join(MODULES_DIR))?;

        let to_install: Vec<&Artifact> = artifacts.iter().collect();
        Installer::new(self.repository.as_ref(), self.filesystem.as_ref())
            .install_all(server_dir, &to_install)?;

        for artifact in artifacts {
            server.record_artifact(artifact.clone());
        }
        self.store.save(server)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, server_dir: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(server_dir) {
            warn!(
                error = %e,
                path = %server_dir.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{
        FakeDistributions, FakeFs, FakeRepository, FakeStore, ScriptedPrompter,
    };
    use crate::domain::{DbDriver, Distribution};
    use crate::error::SdkError;

    struct Fixture {
        fs: FakeFs,
        store: FakeStore,
        missing: Vec<String>,
        distributions: FakeDistributions,
    }

    impl Fixture {
        fn new() -> Self {
            let mut distributions = FakeDistributions::default();
            distributions.manifests.insert(
                "refapp.toml".into(),
                Distribution::new(
                    "Reference Application",
                    "2.3.1",
                    vec![
                        Artifact::platform("1.11.5"),
                        Artifact::new("webservices.rest-omod", "2.12"),
                    ],
                ),
            );
            Self {
                fs: FakeFs::default(),
                store: FakeStore::default(),
                missing: Vec::new(),
                distributions,
            }
        }

        fn service(&self, answers: &[&str]) -> SetupService {
            SetupService::new(
                Box::new(self.store.clone()),
                Box::new(FakeRepository {
                    fs: self.fs.clone(),
                    missing: self.missing.clone(),
                }),
                Box::new(self.distributions.clone()),
                Box::new(self.fs.clone()),
                Box::new(ScriptedPrompter::new(answers)),
                vec!["1.11.6".into(), "2.0.0".into()],
            )
        }
    }

    #[test]
    fn platform_setup_from_answers() {
        let fixture = Fixture::new();
        // server id, install kind, version, h2?, demo data?
        let server = fixture
            .service(&["", "1", "2", "y", "n"])
            .setup(SetupRequest::default())
            .unwrap();

        assert_eq!(server.server_id, "server");
        assert_eq!(server.platform_version.as_deref(), Some("2.0.0"));
        assert_eq!(server.database.driver, DbDriver::H2);
        assert!(!server.include_demo_data);
        assert!(fixture.fs.has_file("/servers/server/openmrs-2.0.0.war"));
        assert!(fixture.store.exists("server"));
    }

    #[test]
    fn distribution_setup_installs_modules() {
        let fixture = Fixture::new();
        let request = SetupRequest {
            server_id: Some("refapp".into()),
            distribution: Some("refapp.toml".into()),
            database: Some(DatabaseConfig::h2()),
            include_demo_data: Some(true),
            ..SetupRequest::default()
        };

        let server = fixture.service(&[]).setup(request).unwrap();

        assert_eq!(server.distribution.unwrap().version, "2.3.1");
        assert_eq!(server.artifacts.len(), 2);
        assert!(fixture.fs.has_file("/servers/refapp/openmrs-1.11.5.war"));
        assert!(fixture.fs.has_file("/servers/refapp/modules/webservices.rest-2.12.omod"));
    }

    #[test]
    fn existing_server_is_rejected() {
        let fixture = Fixture::new();
        fixture.store.save(&ServerConfig::new("taken")).unwrap();
        let request = SetupRequest {
            server_id: Some("taken".into()),
            ..SetupRequest::default()
        };

        let err = fixture.service(&[]).setup(request).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Application(ApplicationError::ServerExists { .. })
        ));
    }

    #[test]
    fn failed_install_rolls_back_server_dir() {
        let mut fixture = Fixture::new();
        fixture.missing = vec!["webservices.rest-omod".into()];
        let request = SetupRequest {
            server_id: Some("refapp".into()),
            distribution: Some("refapp.toml".into()),
            database: Some(DatabaseConfig::h2()),
            include_demo_data: Some(false),
            ..SetupRequest::default()
        };

        assert!(fixture.service(&[]).setup(request).is_err());
        assert!(!fixture.fs.exists(Path::new("/servers/refapp")));
        assert!(fixture.fs.files().is_empty());
        assert!(!fixture.store.exists("refapp"));
    }
}
