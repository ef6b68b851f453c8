//! Setup, upgrade and module management against a real directory tree.

use std::fs;
use std::path::Path;

use omrs_adapters::{
    BatchPrompter, LocalFilesystem, LocalRepository, TomlDistributionSource, TomlServerStore,
};
use omrs_core::application::{
    DeployOutcome, DeployRequest, DeployService, ModuleInstallOutcome, ModuleRequest,
    ModuleService, SetupRequest, SetupService, ports::ServerStore,
};
use omrs_core::domain::{Artifact, DatabaseConfig, DbDriver};
use tempfile::TempDir;

struct Workspace {
    _root: TempDir,
    servers: std::path::PathBuf,
    repository: LocalRepository,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let servers = root.path().join("servers");
        let repository = LocalRepository::new(root.path().join("m2"));
        Self {
            _root: root,
            servers,
            repository,
        }
    }

    fn publish(&self, artifact: &Artifact) {
        let path = self.repository.artifact_path(artifact);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, artifact.coordinates()).unwrap();
    }

    fn publish_distribution(&self, coordinates: &str, manifest: &str) {
        let source = TomlDistributionSource::new(self.repository.clone());
        let path = source.manifest_path(&Artifact::parse_coordinates(coordinates).unwrap());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, manifest).unwrap();
    }

    fn store(&self) -> TomlServerStore {
        TomlServerStore::new(&self.servers)
    }

    fn setup(&self, answers: &str) -> SetupService {
        SetupService::new(
            Box::new(self.store()),
            Box::new(self.repository.clone()),
            Box::new(TomlDistributionSource::new(self.repository.clone())),
            Box::new(LocalFilesystem::new()),
            Box::new(BatchPrompter::from_list(answers)),
            vec!["1.11.6".into(), "2.0.0".into()],
        )
    }

    fn deploy(&self, answers: &str) -> DeployService {
        DeployService::new(
            Box::new(self.store()),
            Box::new(self.repository.clone()),
            Box::new(TomlDistributionSource::new(self.repository.clone())),
            Box::new(LocalFilesystem::new()),
            Box::new(BatchPrompter::from_list(answers)),
            Vec::new(),
        )
    }

    fn modules(&self) -> ModuleService {
        ModuleService::new(
            Box::new(self.store()),
            Box::new(self.repository.clone()),
            Box::new(LocalFilesystem::new()),
            Box::new(BatchPrompter::new(Vec::<String>::new())),
        )
    }

    fn server_file(&self, relative: &str) -> bool {
        self.servers.join(relative).is_file()
    }
}

const REFAPP_23: &str = r#"
name = "Reference Application"
version = "2.3"

[[artifacts]]
group_id = "org.openmrs.web"
artifact_id = "openmrs-webapp"
version = "1.11.5"
type = "war"

[[artifacts]]
artifact_id = "webservices.rest-omod"
version = "2.11"
"#;

const REFAPP_24: &str = r#"
name = "Reference Application"
version = "2.4"

[[artifacts]]
group_id = "org.openmrs.web"
artifact_id = "openmrs-webapp"
version = "2.0.0"
type = "war"

[[artifacts]]
artifact_id = "webservices.rest-omod"
version = "2.12"

[[artifacts]]
artifact_id = "drugs-omod"
version = "0.2-SNAPSHOT"
"#;

fn publish_refapp(ws: &Workspace) {
    for artifact in [
        Artifact::platform("1.11.5"),
        Artifact::platform("2.0.0"),
        Artifact::new("webservices.rest-omod", "2.11"),
        Artifact::new("webservices.rest-omod", "2.12"),
        Artifact::new("drugs-omod", "0.2-SNAPSHOT"),
    ] {
        ws.publish(&artifact);
    }
    ws.publish_distribution("referenceapplication:2.3", REFAPP_23);
    ws.publish_distribution("referenceapplication:2.4", REFAPP_24);
}

#[test]
fn platform_setup_from_batch_answers() {
    let ws = Workspace::new();
    ws.publish(&Artifact::platform("2.0.0"));

    // id, install kind (Platform), version (2.0.0), h2, demo data
    let server = ws.setup("demo,1,2,y,n").setup(SetupRequest::default()).unwrap();

    assert_eq!(server.server_id, "demo");
    assert_eq!(server.platform_version.as_deref(), Some("2.0.0"));
    assert_eq!(server.database.driver, DbDriver::H2);
    assert!(!server.include_demo_data);
    assert!(ws.server_file("demo/openmrs-2.0.0.war"));
    assert!(ws.servers.join("demo/modules").is_dir());
    assert_eq!(ws.store().load("demo").unwrap(), server);
}

#[test]
fn failed_setup_leaves_no_server_behind() {
    let ws = Workspace::new();

    let request = SetupRequest {
        server_id: Some("broken".into()),
        platform_version: Some("9.9.9".into()),
        database: Some(DatabaseConfig::h2()),
        include_demo_data: Some(false),
        ..SetupRequest::default()
    };
    assert!(ws.setup("").setup(request).is_err());
    assert!(!ws.servers.join("broken").exists());
}

#[test]
fn distribution_upgrade_replaces_files() {
    let ws = Workspace::new();
    publish_refapp(&ws);

    let request = SetupRequest {
        server_id: Some("clinic".into()),
        distribution: Some("referenceapplication:2.3".into()),
        database: Some(DatabaseConfig::mysql(
            "jdbc:mysql://localhost:3306/@DBNAME@",
            "root",
            "secret",
        )),
        include_demo_data: Some(true),
        ..SetupRequest::default()
    };
    let server = ws.setup("").setup(request).unwrap();
    assert_eq!(server.distribution.as_ref().unwrap().version, "2.3");
    assert!(server.database.uri.contains("/openmrs?"));
    assert!(ws.server_file("clinic/modules/webservices.rest-2.11.omod"));

    let outcome = ws
        .deploy("y")
        .deploy(DeployRequest {
            server_id: Some("clinic".into()),
            distribution: Some("referenceapplication:2.4".into()),
            ..DeployRequest::default()
        })
        .unwrap();

    let DeployOutcome::Applied { server, changes } = outcome else {
        panic!("upgrade was not applied");
    };
    assert_eq!(
        changes,
        vec![
            "upgrade platform from 1.11.5 to 2.0.0",
            "upgrade module webservices.rest-omod from 2.11 to 2.12",
            "add module drugs-omod version 0.2-SNAPSHOT",
        ]
    );
    assert_eq!(server.distribution.unwrap().version, "2.4");
    assert!(ws.server_file("clinic/openmrs-2.0.0.war"));
    assert!(!ws.server_file("clinic/openmrs-1.11.5.war"));
    assert!(ws.server_file("clinic/modules/webservices.rest-2.12.omod"));
    assert!(!ws.server_file("clinic/modules/webservices.rest-2.11.omod"));
    assert!(ws.server_file("clinic/modules/drugs-0.2-SNAPSHOT.omod"));
}

#[test]
fn declining_keeps_the_server() {
    let ws = Workspace::new();
    publish_refapp(&ws);

    let request = SetupRequest {
        server_id: Some("clinic".into()),
        distribution: Some("referenceapplication:2.3".into()),
        database: Some(DatabaseConfig::h2()),
        include_demo_data: Some(false),
        ..SetupRequest::default()
    };
    ws.setup("").setup(request).unwrap();
    let before = fs::read_to_string(ws.servers.join("clinic/server.toml")).unwrap();

    let outcome = ws
        .deploy("n")
        .deploy(DeployRequest {
            server_id: Some("clinic".into()),
            distribution: Some("referenceapplication:2.4".into()),
            ..DeployRequest::default()
        })
        .unwrap();

    assert_eq!(outcome, DeployOutcome::Declined);
    assert_eq!(
        fs::read_to_string(ws.servers.join("clinic/server.toml")).unwrap(),
        before
    );
    assert!(ws.server_file("clinic/openmrs-1.11.5.war"));
}

#[test]
fn module_install_update_and_uninstall() {
    let ws = Workspace::new();
    ws.publish(&Artifact::platform("2.0.0"));
    ws.publish(&Artifact::new("appui-omod", "1.0"));
    ws.publish(&Artifact::new("appui-omod", "1.1"));
    ws.setup("demo,1,2,y,n").setup(SetupRequest::default()).unwrap();

    let request = |version: &str| ModuleRequest {
        server_id: Some("demo".into()),
        group_id: Some("org.openmrs.module".into()),
        artifact_id: Some("appui".into()),
        version: Some(version.into()),
    };

    let installed = ws.modules().install(request("1.0")).unwrap();
    assert!(matches!(installed, ModuleInstallOutcome::Installed(_)));

    let updated = ws.modules().install(request("1.1")).unwrap();
    assert!(matches!(updated, ModuleInstallOutcome::Updated { ref from, .. } if from == "1.0"));
    assert!(ws.server_file("demo/modules/appui-1.1.omod"));
    assert!(!Path::new(&ws.servers.join("demo/modules/appui-1.0.omod")).exists());

    let removed = ws.modules().uninstall(Some("demo"), Some("appui-omod")).unwrap();
    assert_eq!(removed.version, "1.1");
    assert!(!ws.server_file("demo/modules/appui-1.1.omod"));
    assert!(ws.store().load("demo").unwrap().find_module("appui-omod").is_none());
}

#[test]
fn manifest_without_omod_suffix_updates_installed_module() {
    let ws = Workspace::new();
    ws.publish(&Artifact::platform("2.0.0"));
    ws.publish(&Artifact::new("appui-omod", "1.0"));
    ws.publish(&Artifact::new("appui-omod", "1.1"));
    ws.publish_distribution(
        "clinicdistro:1.1",
        r#"
name = "Clinic"
version = "1.1"

[[artifacts]]
group_id = "org.openmrs.web"
artifact_id = "openmrs-webapp"
version = "2.0.0"
type = "war"

[[artifacts]]
artifact_id = "appui"
version = "1.1"
"#,
    );
    ws.setup("demo,1,2,y,n").setup(SetupRequest::default()).unwrap();
    ws.modules()
        .install(ModuleRequest {
            server_id: Some("demo".into()),
            group_id: Some("org.openmrs.module".into()),
            artifact_id: Some("appui".into()),
            version: Some("1.0".into()),
        })
        .unwrap();

    let outcome = ws
        .deploy("y")
        .deploy(DeployRequest {
            server_id: Some("demo".into()),
            distribution: Some("clinicdistro:1.1".into()),
            ..DeployRequest::default()
        })
        .unwrap();

    let DeployOutcome::Applied { server, changes } = outcome else {
        panic!("upgrade was not applied");
    };
    assert_eq!(changes, vec!["upgrade module appui-omod from 1.0 to 1.1"]);
    assert_eq!(server.modules().count(), 1);
    assert_eq!(server.find_module("appui-omod").unwrap().version, "1.1");

    let modules: Vec<_> = fs::read_dir(ws.servers.join("demo/modules"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(modules, vec!["appui-1.1.omod"]);
}

#[test]
fn failed_deploy_restores_refreshed_snapshot() {
    let ws = Workspace::new();
    let appui = Artifact::new("appui-omod", "0.1-SNAPSHOT");
    ws.publish(&Artifact::platform("2.0.0"));
    ws.publish(&appui);
    let manifest = |version: &str, extra: &str| {
        format!(
            r#"
name = "Snapshots"
version = "{version}"

[[artifacts]]
group_id = "org.openmrs.web"
artifact_id = "openmrs-webapp"
version = "2.0.0"
type = "war"

[[artifacts]]
artifact_id = "appui-omod"
version = "0.1-SNAPSHOT"
{extra}"#
        )
    };
    ws.publish_distribution("snap:1", &manifest("1", ""));
    ws.publish_distribution(
        "snap:2",
        &manifest("2", "\n[[artifacts]]\nartifact_id = \"ghost-omod\"\nversion = \"1.0\"\n"),
    );

    let request = SetupRequest {
        server_id: Some("demo".into()),
        distribution: Some("snap:1".into()),
        database: Some(DatabaseConfig::h2()),
        include_demo_data: Some(false),
        ..SetupRequest::default()
    };
    ws.setup("").setup(request).unwrap();
    let installed = ws.servers.join("demo/modules/appui-0.1-SNAPSHOT.omod");
    let before = fs::read(&installed).unwrap();

    fs::write(ws.repository.artifact_path(&appui), "REBUILT").unwrap();
    let result = ws.deploy("y").deploy(DeployRequest {
        server_id: Some("demo".into()),
        distribution: Some("snap:2".into()),
        ..DeployRequest::default()
    });

    assert!(result.is_err());
    assert_eq!(fs::read(&installed).unwrap(), before);
    assert!(!ws.server_file("demo/modules/appui-0.1-SNAPSHOT.omod.bak"));
    assert!(!ws.server_file("demo/modules/ghost-1.0.omod"));
}
