//! Description of a new module project and the archetype that generates it.

use std::fmt;
use std::path::PathBuf;

use crate::domain::artifact::GROUP_MODULE;
use crate::domain::error::DomainError;
use crate::domain::validation::DomainValidator;

pub const DEFAULT_MODULE_ID: &str = "basicexample";
pub const DEFAULT_DESCRIPTION: &str = "no description";
pub const DEFAULT_VERSION: &str = "1.0.0-SNAPSHOT";
pub const DEFAULT_AUTHOR: &str = "anonymous";
pub const DEFAULT_PLATFORM_VERSION: &str = "1.11.6";
pub const DEFAULT_REFAPP_VERSION: &str = "2.4";

pub const ARCHETYPE_GROUP_ID: &str = "org.openmrs.maven.archetypes";
pub const ARCHETYPE_PLATFORM: &str = "openmrs-sdk-archetype-module-platform";
pub const ARCHETYPE_REFAPP: &str = "openmrs-sdk-archetype-module-refapp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    PlatformModule,
    ReferenceApplicationModule,
}

impl ProjectKind {
    pub fn archetype_artifact_id(self) -> &'static str {
        match self {
            Self::PlatformModule => ARCHETYPE_PLATFORM,
            Self::ReferenceApplicationModule => ARCHETYPE_REFAPP,
        }
    }

    /// Default minimum version of whatever the module depends on.
    pub fn default_min_version(self) -> &'static str {
        match self {
            Self::PlatformModule => DEFAULT_PLATFORM_VERSION,
            Self::ReferenceApplicationModule => DEFAULT_REFAPP_VERSION,
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PlatformModule => "Platform module",
            Self::ReferenceApplicationModule => "Reference Application module",
        })
    }
}

/// A validated module project description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProject {
    pub kind: ProjectKind,
    pub module_id: String,
    pub module_name: String,
    pub description: String,
    pub group_id: String,
    pub version: String,
    pub author: String,
    /// Minimum platform version, or minimum reference application version
    /// for [`ProjectKind::ReferenceApplicationModule`].
    pub min_version: String,
}

impl ModuleProject {
    /// Build a project, normalising and validating the identifiers.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ProjectKind,
        module_id: &str,
        module_name: &str,
        description: impl Into<String>,
        group_id: &str,
        version: impl Into<String>,
        author: impl Into<String>,
        min_version: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            kind,
            module_id: DomainValidator::module_id(module_id)?,
            module_name: DomainValidator::module_name(module_name)?,
            description: description.into(),
            group_id: DomainValidator::group_id(group_id)?,
            version: version.into(),
            author: author.into(),
            min_version: min_version.into(),
        })
    }

    /// Module name without whitespace and dots, used as a Java class prefix.
    pub fn class_name_prefix(&self) -> String {
        self.module_name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .collect()
    }

    pub fn package(&self) -> String {
        format!("{GROUP_MODULE}.{}", self.module_id)
    }

    /// The archetype invocation that generates this project.
    pub fn archetype_request(
        &self,
        archetype_version: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> ArchetypeRequest {
        let mut properties = vec![
            ("groupId".to_string(), self.group_id.clone()),
            ("artifactId".to_string(), self.module_id.clone()),
            ("version".to_string(), self.version.clone()),
            ("package".to_string(), self.package()),
            ("moduleName".to_string(), self.module_name.clone()),
            ("moduleNameNoSpaces".to_string(), self.class_name_prefix()),
            ("moduleDescription".to_string(), self.description.clone()),
            ("user.name".to_string(), self.author.clone()),
        ];
        let min_key = match self.kind {
            ProjectKind::PlatformModule => "openmrsPlatformVersion",
            ProjectKind::ReferenceApplicationModule => "openmrsRefappVersion",
        };
        properties.push((min_key.to_string(), self.min_version.clone()));

        ArchetypeRequest {
            archetype_group_id: ARCHETYPE_GROUP_ID.to_string(),
            archetype_artifact_id: self.kind.archetype_artifact_id().to_string(),
            archetype_version: archetype_version.into(),
            catalog: None,
            output_dir: output_dir.into(),
            properties,
        }
    }
}

/// Everything the archetype generator needs, passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeRequest {
    pub archetype_group_id: String,
    pub archetype_artifact_id: String,
    pub archetype_version: String,
    pub catalog: Option<String>,
    pub output_dir: PathBuf,
    /// Ordered `-Dkey=value` properties.
    pub properties: Vec<(String, String)>,
}

impl ArchetypeRequest {
    pub fn with_catalog(mut self, catalog: Option<String>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
