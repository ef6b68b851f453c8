//! Project Service - scaffolds a new module project through an archetype.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::application::{
    ports::{ArchetypeRunner, Prompter},
    services::wizard::Wizard,
};
use crate::domain::{
    DomainError, DomainValidator, GROUP_MODULE, ModuleProject, ProjectKind, Version,
    project::{DEFAULT_AUTHOR, DEFAULT_DESCRIPTION, DEFAULT_MODULE_ID, DEFAULT_VERSION},
};
use crate::error::SdkResult;

/// Options for a new project; anything missing is asked for.
#[derive(Debug, Clone, Default)]
pub struct ProjectRequest {
    pub kind: Option<ProjectKind>,
    pub module_id: Option<String>,
    pub module_name: Option<String>,
    pub description: Option<String>,
    pub group_id: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub min_version: Option<String>,
    pub output_dir: PathBuf,
}

pub struct ProjectService {
    runner: Box<dyn ArchetypeRunner>,
    prompter: Box<dyn Prompter>,
    archetype_version: String,
    catalog: Option<String>,
}

impl ProjectService {
    pub fn new(
        runner: Box<dyn ArchetypeRunner>,
        prompter: Box<dyn Prompter>,
        archetype_version: impl Into<String>,
        catalog: Option<String>,
    ) -> Self {
        Self {
            runner,
            prompter,
            archetype_version: archetype_version.into(),
            catalog,
        }
    }

    /// Collect the project description and generate it.
    #[instrument(skip_all, fields(output_dir = %request.output_dir.display()))]
    pub fn create(&self, request: ProjectRequest) -> SdkResult<ModuleProject> {
        let wizard = Wizard::new(self.prompter.as_ref());

        let kind = match request.kind {
            Some(kind) => kind,
            None => {
                let kinds = [ProjectKind::PlatformModule, ProjectKind::ReferenceApplicationModule];
                let labels: Vec<String> = kinds.iter().map(ToString::to_string).collect();
                let chosen = wizard.choose("What kind of project would you like to create?", &labels, None)?;
                kinds
                    .into_iter()
                    .find(|k| k.to_string() == chosen)
                    .unwrap_or(ProjectKind::PlatformModule)
            }
        };

        let module_id = wizard.validated(
            request.module_id.as_deref(),
            "Specify module id",
            Some(DEFAULT_MODULE_ID),
            DomainValidator::module_id,
        )?;
        let module_name = wizard.validated(
            request.module_name.as_deref(),
            "Specify module name",
            Some(&module_id),
            DomainValidator::module_name,
        )?;
        let description = wizard.value_or_prompt(
            request.description.as_deref(),
            "Describe your module in a few words",
            Some(DEFAULT_DESCRIPTION),
        )?;
        let group_id = wizard.validated(
            request.group_id.as_deref(),
            "Specify groupId",
            Some(GROUP_MODULE),
            DomainValidator::group_id,
        )?;
        let version = wizard.value_or_prompt(
            request.version.as_deref(),
            "Specify initial version",
            Some(DEFAULT_VERSION),
        )?;
        let author =
            wizard.value_or_prompt(request.author.as_deref(), "Who is the author of the module?", Some(DEFAULT_AUTHOR))?;
        let min_version = wizard.validated(
            request.min_version.as_deref(),
            match kind {
                ProjectKind::PlatformModule => "What is the lowest version of the platform you want to support?",
                ProjectKind::ReferenceApplicationModule => {
                    "What is the lowest version of the Reference Application you want to support?"
                }
            },
            Some(kind.default_min_version()),
            release_version,
        )?;

        let project = ModuleProject::new(
            kind,
            &module_id,
            &module_name,
            description,
            &group_id,
            version,
            author,
            min_version,
        )?;

        let request = project
            .archetype_request(&self.archetype_version, request.output_dir)
            .with_catalog(self.catalog.clone());
        self.runner.generate(&request)?;

        info!(module_id = %project.module_id, kind = %project.kind, "Project created");
        Ok(project)
    }
}

/// Accept `1.11.6` and `2.4-SNAPSHOT` alike: the part before any qualifier
/// must be a dotted numeric version.
fn release_version(input: &str) -> Result<String, DomainError> {
    let input = input.trim();
    let numeric = input.split_once('-').map_or(input, |(n, _)| n);
    Version::parse(numeric)?;
    Ok(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockArchetypeRunner;
    use crate::application::services::testing::ScriptedPrompter;
    use crate::domain::project::{ARCHETYPE_PLATFORM, ARCHETYPE_REFAPP};
    use mockall::predicate::function;

    #[test]
    fn answers_fill_the_archetype_request() {
        let mut runner = MockArchetypeRunner::new();
        runner
            .expect_generate()
            .with(function(|r: &crate::domain::ArchetypeRequest| {
                r.archetype_artifact_id == ARCHETYPE_PLATFORM
                    && r.archetype_version == "1.0.1"
                    && r.property("artifactId") == Some("labs")
                    && r.property("moduleName") == Some("Lab results")
                    && r.property("openmrsPlatformVersion") == Some("1.11.6")
            }))
            .times(1)
            .returning(|_| Ok(()));

        // kind, id, name, description, group, version, author, min version
        let prompter = ScriptedPrompter::new(&["1", "labs", "lab results", "", "", "", "", ""]);
        let service = ProjectService::new(Box::new(runner), Box::new(prompter), "1.0.1", None);

        let project = service
            .create(ProjectRequest {
                output_dir: "/work".into(),
                ..ProjectRequest::default()
            })
            .unwrap();

        assert_eq!(project.kind, ProjectKind::PlatformModule);
        assert_eq!(project.description, DEFAULT_DESCRIPTION);
        assert_eq!(project.author, DEFAULT_AUTHOR);
        assert_eq!(project.version, DEFAULT_VERSION);
    }

    #[test]
    fn refapp_project_from_options() {
        let mut runner = MockArchetypeRunner::new();
        runner
            .expect_generate()
            .withf(|r| {
                r.archetype_artifact_id == ARCHETYPE_REFAPP
                    && r.catalog.as_deref() == Some("http://example.org/catalog.xml")
                    && r.property("openmrsRefappVersion") == Some("2.4")
            })
            .times(1)
            .returning(|_| Ok(()));

        let request = ProjectRequest {
            kind: Some(ProjectKind::ReferenceApplicationModule),
            module_id: Some("appointments".into()),
            module_name: Some("Appointments".into()),
            description: Some("Book visits".into()),
            group_id: Some(GROUP_MODULE.into()),
            version: Some("0.1.0-SNAPSHOT".into()),
            author: Some("clinic".into()),
            min_version: None,
            output_dir: "/work".into(),
        };
        let service = ProjectService::new(
            Box::new(runner),
            Box::new(ScriptedPrompter::new(&[""])),
            "1.0.1",
            Some("http://example.org/catalog.xml".into()),
        );

        let project = service.create(request).unwrap();
        assert_eq!(project.min_version, "2.4");
    }

    #[test]
    fn invalid_module_id_is_asked_again() {
        let mut runner = MockArchetypeRunner::new();
        runner.expect_generate().times(1).returning(|_| Ok(()));

        let request = ProjectRequest {
            kind: Some(ProjectKind::PlatformModule),
            module_id: Some("Not-Valid".into()),
            module_name: Some("Valid".into()),
            description: Some("d".into()),
            group_id: Some(GROUP_MODULE.into()),
            version: Some("1.0".into()),
            author: Some("a".into()),
            min_version: Some("1.9".into()),
            output_dir: "/work".into(),
        };
        let service = ProjectService::new(
            Box::new(runner),
            Box::new(ScriptedPrompter::new(&["fixed"])),
            "1.0.1",
            None,
        );

        assert_eq!(service.create(request).unwrap().module_id, "fixed");
    }

    #[test]
    fn generator_failure_propagates() {
        let mut runner = MockArchetypeRunner::new();
        runner.expect_generate().returning(|_| {
            Err(crate::application::ApplicationError::ExternalCommandFailed {
                command: "mvn".into(),
                reason: "exit status 1".into(),
            }
            .into())
        });

        let request = ProjectRequest {
            kind: Some(ProjectKind::PlatformModule),
            module_id: Some("labs".into()),
            module_name: Some("Labs".into()),
            description: Some("d".into()),
            group_id: Some(GROUP_MODULE.into()),
            version: Some("1.0".into()),
            author: Some("a".into()),
            min_version: Some("1.9".into()),
            output_dir: "/work".into(),
        };
        let service =
            ProjectService::new(Box::new(runner), Box::new(ScriptedPrompter::new(&[])), "1.0.1", None);

        assert!(service.create(request).is_err());
    }

    #[test]
    fn min_version_may_carry_a_qualifier() {
        assert_eq!(release_version("2.4-SNAPSHOT").unwrap(), "2.4-SNAPSHOT");
        assert!(release_version("latest").is_err());
    }
}
