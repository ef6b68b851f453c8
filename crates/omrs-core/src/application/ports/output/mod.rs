//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `omrs-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{ArchetypeRequest, Artifact, Distribution, ServerConfig};
use crate::error::SdkResult;

/// Port for filesystem operations.
///
/// Implemented by `omrs_adapters::LocalFilesystem`. Service tests use an
/// in-memory fake.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SdkResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &[u8]) -> SdkResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> SdkResult<()>;

    /// Move a file, replacing `to` if it exists.
    fn rename(&self, from: &Path, to: &Path) -> SdkResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Direct children of a directory, sorted by path.
    fn list_dir(&self, path: &Path) -> SdkResult<Vec<PathBuf>>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> SdkResult<()>;
}

/// Port for line-oriented questions to the user.
///
/// Implementations decide where answers come from: a terminal, a reader,
/// or a queue of pre-supplied answers.
pub trait Prompter: Send + Sync {
    /// Ask a question. A blank answer yields `default` when there is one.
    fn ask(&self, prompt: &str, default: Option<&str>) -> SdkResult<String>;

    /// Show an informational line.
    fn show(&self, message: &str);
}

/// Port for persisted server configurations.
pub trait ServerStore: Send + Sync {
    fn exists(&self, server_id: &str) -> bool;

    fn load(&self, server_id: &str) -> SdkResult<ServerConfig>;

    /// Create or overwrite the server's configuration file.
    fn save(&self, config: &ServerConfig) -> SdkResult<()>;

    /// Ids of all servers, most recently modified first.
    fn list(&self) -> SdkResult<Vec<String>>;

    /// Directory holding the server's files.
    fn server_dir(&self, server_id: &str) -> PathBuf;
}

/// Port for locating artifacts and copying them into servers.
pub trait ArtifactRepository: Send + Sync {
    /// Location of the artifact's file in the repository.
    fn resolve(&self, artifact: &Artifact) -> SdkResult<PathBuf>;

    /// Copy the artifact into `dest_dir` as [`Artifact::dest_file_name`],
    /// returning the written path.
    fn install(&self, artifact: &Artifact, dest_dir: &Path) -> SdkResult<PathBuf>;
}

/// Port for reading distribution manifests.
pub trait DistributionSource: Send + Sync {
    /// Load a distribution from a manifest path or `artifactId:version`
    /// coordinates.
    fn load(&self, reference: &str) -> SdkResult<Distribution>;
}

/// Port for project generation from an archetype.
#[cfg_attr(test, mockall::automock)]
pub trait ArchetypeRunner: Send + Sync {
    fn generate(&self, request: &ArchetypeRequest) -> SdkResult<()>;
}
