//! Distribution manifests in TOML.
//!
//! A reference is either a path to a manifest file or `artifactId:version`
//! (or `groupId:artifactId:version`) coordinates of a manifest published to
//! the local repository as `<artifactId>-<version>.toml`.
//!
//! ```toml
//! name = "Reference Application"
//! version = "2.4"
//!
//! [[artifacts]]
//! group_id = "org.openmrs.web"
//! artifact_id = "openmrs-webapp"
//! version = "2.0.0"
//! type = "war"
//!
//! [[artifacts]]
//! artifact_id = "appui-omod"
//! version = "1.7"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use omrs_core::{
    application::{ApplicationError, ports::DistributionSource},
    domain::{Artifact, Distribution},
    error::SdkResult,
};
use tracing::{debug, instrument};

use crate::error::AdapterError;
use crate::repository::LocalRepository;

const MANIFEST_EXTENSION: &str = "toml";

#[derive(Debug, Clone)]
pub struct TomlDistributionSource {
    repository: LocalRepository,
}

impl TomlDistributionSource {
    pub fn new(repository: LocalRepository) -> Self {
        Self { repository }
    }

    /// Where the manifest for `coordinates` is published.
    pub fn manifest_path(&self, coordinates: &Artifact) -> PathBuf {
        self.repository
            .version_dir(&coordinates.group_id, &coordinates.artifact_id, &coordinates.version)
            .join(format!(
                "{}-{}.{MANIFEST_EXTENSION}",
                coordinates.artifact_id, coordinates.version
            ))
    }

    fn locate(&self, reference: &str) -> SdkResult<PathBuf> {
        let as_path = Path::new(reference);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }
        if !reference.contains(':') {
            return Err(ApplicationError::ArtifactNotFound {
                coordinates: reference.to_string(),
                path: as_path.to_path_buf(),
            }
            .into());
        }

        let coordinates = Artifact::parse_coordinates(reference)?;
        let path = self.manifest_path(&coordinates);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ApplicationError::ArtifactNotFound {
                coordinates: format!("{}:{}", coordinates.key(), coordinates.version),
                path,
            }
            .into())
        }
    }
}

/// Parse and validate manifest text. Bare module ids get their `-omod`
/// suffix.
pub fn parse_manifest(path: &Path, raw: &str) -> SdkResult<Distribution> {
    let mut distribution: Distribution = toml::from_str(raw).map_err(|e| AdapterError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    distribution.normalize_module_ids();
    distribution.validate()?;
    Ok(distribution)
}

impl DistributionSource for TomlDistributionSource {
    #[instrument(skip(self))]
    fn load(&self, reference: &str) -> SdkResult<Distribution> {
        let path = self.locate(reference)?;
        let raw = fs::read_to_string(&path).map_err(|e| AdapterError::io("read", &path, e))?;
        let distribution = parse_manifest(&path, &raw)?;
        debug!(
            name = %distribution.name,
            version = %distribution.version,
            artifacts = distribution.artifacts.len(),
            "Loaded distribution"
        );
        Ok(distribution)
    }
}
