//! Deployable artifacts and their identity.
//!
//! Two artifacts are the same artifact when they share `group_id` and
//! `artifact_id`; the version and packaging type do not take part in
//! equality or hashing. This is what lets an installed set be matched
//! against a desired distribution entry by entry.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::version::Version;

/// Default group for platform modules.
pub const GROUP_MODULE: &str = "org.openmrs.module";
/// Group of the platform web application.
pub const GROUP_WEB: &str = "org.openmrs.web";
/// Group of the platform itself.
pub const GROUP_OPENMRS: &str = "org.openmrs";
/// Group of published distributions.
pub const GROUP_DISTRO: &str = "org.openmrs.distro";

/// Artifact id of the platform web application.
pub const PLATFORM_ARTIFACT_ID: &str = "openmrs-webapp";

/// Artifact id suffix of module packages (`appui-omod`).
pub const OMOD_SUFFIX: &str = "-omod";

const REFAPP_SHORT_ID: &str = "referenceapplication";
const REFAPP_PACKAGE_ID: &str = "referenceapplication-package";

/// Packaging type of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    /// Module package.
    #[default]
    Omod,
    /// Web application (the platform).
    War,
    /// Plain library.
    Jar,
}

impl ArtifactType {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Omod => "omod",
            Self::War => "war",
            Self::Jar => "jar",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArtifactType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "omod" => Ok(Self::Omod),
            "war" => Ok(Self::War),
            "jar" => Ok(Self::Jar),
            _ => Err(DomainError::UnknownArtifactType(s.to_string())),
        }
    }
}

/// The identity part of an artifact: `(group_id, artifact_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey {
    pub group_id: String,
    pub artifact_id: String,
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// A deployable unit: the platform war, a module omod or a library jar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default = "default_group")]
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default)]
    pub artifact_type: ArtifactType,
}

fn default_group() -> String {
    GROUP_MODULE.to_string()
}

impl Artifact {
    /// A module artifact in the default module group.
    pub fn new(artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self::with_group(artifact_id, version, GROUP_MODULE)
    }

    pub fn with_group(
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self::full(artifact_id, version, group_id, ArtifactType::Omod)
    }

    pub fn full(
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        group_id: impl Into<String>,
        artifact_type: ArtifactType,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type,
        }
    }

    /// The platform web application at `version`.
    pub fn platform(version: impl Into<String>) -> Self {
        Self::full(PLATFORM_ARTIFACT_ID, version, GROUP_WEB, ArtifactType::War)
    }

    /// Parse `artifactId:version` or `groupId:artifactId:version`.
    ///
    /// The two-part form names a distribution; `referenceapplication` is
    /// shorthand for the packaged reference application.
    pub fn parse_coordinates(text: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidCoordinates {
            input: text.to_string(),
        };

        let parts: Vec<&str> = text.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid());
        }

        match parts.as_slice() {
            [artifact_id, version] => {
                let artifact_id = if *artifact_id == REFAPP_SHORT_ID {
                    REFAPP_PACKAGE_ID
                } else {
                    artifact_id
                };
                Ok(Self::with_group(artifact_id, *version, GROUP_DISTRO))
            }
            [group_id, artifact_id, version] => {
                Ok(Self::with_group(*artifact_id, *version, *group_id))
            }
            _ => Err(invalid()),
        }
    }

    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
        }
    }

    /// Artifact id up to its first hyphen (`webservices.rest-omod` gives
    /// `webservices.rest`).
    pub fn base_id(&self) -> &str {
        self.artifact_id
            .split_once('-')
            .map_or(self.artifact_id.as_str(), |(base, _)| base)
    }

    /// File name the artifact is installed under.
    pub fn dest_file_name(&self) -> String {
        format!("{}-{}.{}", self.base_id(), self.version, self.artifact_type)
    }

    /// Give a module artifact id its `-omod` suffix, so `appui` and
    /// `appui-omod` name the same module.
    pub fn normalize_module_id(&mut self) {
        if self.artifact_type == ArtifactType::Omod && !self.artifact_id.trim().is_empty() {
            self.artifact_id = with_omod_suffix(&self.artifact_id);
        }
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn is_snapshot(&self) -> bool {
        self.version.contains("SNAPSHOT")
    }

    pub fn is_platform(&self) -> bool {
        self.artifact_type == ArtifactType::War
    }

    /// Maven coordinates, `group:artifact:version`.
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl PartialEq for Artifact {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }
}

impl Eq for Artifact {}

impl Hash for Artifact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.artifact_id.hash(state);
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinates(), self.artifact_type)
    }
}

/// Order two artifact version strings.
///
/// The numeric part before the first `-` is compared as a [`Version`]. On a
/// tie a plain release ranks above a qualified one (`1.0` > `1.0-SNAPSHOT`)
/// and two qualifiers compare as strings. Returns `None` when either numeric
/// part is not a valid version.
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let (a_num, a_qualifier) = split_qualifier(a);
    let (b_num, b_qualifier) = split_qualifier(b);

    let a_num = Version::parse(a_num).ok()?;
    let b_num = Version::parse(b_num).ok()?;

    let ordering = match a_num.compare(&b_num) {
        Ordering::Equal => match (a_qualifier, b_qualifier) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(y),
        },
        decided => decided,
    };
    Some(ordering)
}

/// `artifact_id` with the `-omod` suffix appended unless it has one.
pub fn with_omod_suffix(artifact_id: &str) -> String {
    if artifact_id.ends_with(OMOD_SUFFIX) {
        artifact_id.to_string()
    } else {
        format!("{artifact_id}{OMOD_SUFFIX}")
    }
}

fn split_qualifier(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((number, qualifier)) => (number, Some(qualifier)),
        None => (version, None),
    }
}
