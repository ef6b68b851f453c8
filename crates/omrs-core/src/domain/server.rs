//! Server configuration: what is installed where, and how it connects.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::artifact::{Artifact, ArtifactType};
use crate::domain::database::DatabaseConfig;
use crate::domain::distribution::DistributionRef;

/// Name of the file holding a server's configuration.
pub const SERVER_CONFIG_FILE: &str = "server.toml";
/// Directory (inside the server) that holds module packages.
pub const MODULES_DIR: &str = "modules";

/// Directory inside `server_dir` an artifact is installed into: modules go
/// to `modules/`, the platform war and libraries to the server root.
pub fn artifact_dir(server_dir: &Path, artifact: &Artifact) -> PathBuf {
    match artifact.artifact_type {
        ArtifactType::Omod => server_dir.join(MODULES_DIR),
        ArtifactType::War | ArtifactType::Jar => server_dir.to_path_buf(),
    }
}

/// A project whose build output is redeployed to a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedProject {
    pub group_id: String,
    pub artifact_id: String,
    pub path: PathBuf,
}

impl WatchedProject {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            path: path.into(),
        }
    }
}

/// Configuration of one server directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub include_demo_data: bool,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub watched_projects: Vec<WatchedProject>,
}

impl ServerConfig {
    pub fn new(server_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            distribution: None,
            platform_version: None,
            database: DatabaseConfig::default(),
            include_demo_data: false,
            artifacts: Vec::new(),
            watched_projects: Vec::new(),
        }
    }

    /// The installed platform war, if any.
    pub fn platform(&self) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.is_platform())
    }

    pub fn modules(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| !a.is_platform())
    }

    /// Record `artifact` as installed, replacing any entry with the same key.
    pub fn record_artifact(&mut self, artifact: Artifact) {
        if artifact.is_platform() {
            self.platform_version = Some(artifact.version.clone());
            self.artifacts.retain(|a| !a.is_platform());
            self.artifacts.insert(0, artifact);
            return;
        }
        match self.artifacts.iter_mut().find(|a| **a == artifact) {
            Some(existing) => *existing = artifact,
            None => self.artifacts.push(artifact),
        }
    }

    /// Remove the installed module with `artifact_id`, returning it.
    pub fn remove_module(&mut self, artifact_id: &str) -> Option<Artifact> {
        let index = self
            .artifacts
            .iter()
            .position(|a| !a.is_platform() && a.artifact_id == artifact_id)?;
        Some(self.artifacts.remove(index))
    }

    pub fn find_module(&self, artifact_id: &str) -> Option<&Artifact> {
        self.modules().find(|a| a.artifact_id == artifact_id)
    }

    /// Add a watched project unless an identical one is already present.
    /// Returns whether it was added.
    pub fn add_watched_project(&mut self, project: WatchedProject) -> bool {
        if self.watched_projects.contains(&project) {
            return false;
        }
        self.watched_projects.push(project);
        true
    }
}
