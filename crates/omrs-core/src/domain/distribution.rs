use serde::{Deserialize, Serialize};

use crate::domain::artifact::Artifact;
use crate::domain::error::DomainError;

/// A named, versioned set of artifacts that together make up a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Distribution {
    pub fn new(name: impl Into<String>, version: impl Into<String>, artifacts: Vec<Artifact>) -> Self {
        let mut distribution = Self {
            name: name.into(),
            version: version.into(),
            artifacts,
        };
        distribution.normalize_module_ids();
        distribution
    }

    /// Suffix bare module ids with `-omod`, the form modules are recorded
    /// under when installed one by one. Manifests loaded from text must
    /// call this before [`Self::validate`].
    pub fn normalize_module_ids(&mut self) {
        for artifact in &mut self.artifacts {
            artifact.normalize_module_id();
        }
    }

    /// Check the manifest invariants: a name and version, at most one
    /// platform war, no repeated artifact.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidDistribution("name is blank".into()));
        }
        if self.version.trim().is_empty() {
            return Err(DomainError::InvalidDistribution("version is blank".into()));
        }

        let mut platform: Option<&Artifact> = None;
        let mut seen = std::collections::HashSet::new();
        for artifact in &self.artifacts {
            if artifact.artifact_id.trim().is_empty() || artifact.version.trim().is_empty() {
                return Err(DomainError::InvalidDistribution(format!(
                    "artifact '{}' needs an artifact id and a version",
                    artifact.coordinates()
                )));
            }
            if artifact.is_platform() {
                if let Some(first) = platform {
                    return Err(DomainError::AmbiguousPlatform {
                        first: first.coordinates(),
                        second: artifact.coordinates(),
                    });
                }
                platform = Some(artifact);
            }
            if !seen.insert(artifact.key()) {
                return Err(DomainError::DuplicateArtifact {
                    key: artifact.key().to_string(),
                });
            }
        }
        Ok(())
    }

    /// The platform war, if the distribution ships one.
    pub fn platform(&self) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.is_platform())
    }

    pub fn modules(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| !a.is_platform())
    }

    /// Reference stored in a server config.
    pub fn reference(&self) -> DistributionRef {
        DistributionRef {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }
}

/// Which distribution a server was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRef {
    pub name: String,
    pub version: String,
}

impl std::fmt::Display for DistributionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
