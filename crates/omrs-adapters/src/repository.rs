//! Artifact lookup in a local Maven-layout repository.
//!
//! ```text
//! <root>/<group as path>/<artifactId>/<version>/<artifactId>-<version>.<type>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use omrs_core::{
    application::{ApplicationError, ports::ArtifactRepository},
    domain::Artifact,
    error::SdkResult,
};
use tracing::{debug, instrument};

use crate::error::AdapterError;

#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one artifact version.
    pub fn version_dir(&self, group_id: &str, artifact_id: &str, version: &str) -> PathBuf {
        group_id
            .split('.')
            .fold(self.root.clone(), |path, segment| path.join(segment))
            .join(artifact_id)
            .join(version)
    }

    /// Where `artifact` lives in the repository, present or not.
    pub fn artifact_path(&self, artifact: &Artifact) -> PathBuf {
        self.version_dir(&artifact.group_id, &artifact.artifact_id, &artifact.version)
            .join(format!(
                "{}-{}.{}",
                artifact.artifact_id, artifact.version, artifact.artifact_type
            ))
    }
}

impl ArtifactRepository for LocalRepository {
    fn resolve(&self, artifact: &Artifact) -> SdkResult<PathBuf> {
        let path = self.artifact_path(artifact);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ApplicationError::ArtifactNotFound {
                coordinates: artifact.coordinates(),
                path,
            }
            .into())
        }
    }

    #[instrument(skip_all, fields(artifact = %artifact))]
    fn install(&self, artifact: &Artifact, dest_dir: &Path) -> SdkResult<PathBuf> {
        let source = self.resolve(artifact)?;
        fs::create_dir_all(dest_dir).map_err(|e| AdapterError::io("create directory", dest_dir, e))?;

        let dest = dest_dir.join(artifact.dest_file_name());
        fs::copy(&source, &dest).map_err(|e| AdapterError::io("copy artifact to", &dest, e))?;
        debug!(from = %source.display(), to = %dest.display(), "Copied artifact");
        Ok(dest)
    }
}
