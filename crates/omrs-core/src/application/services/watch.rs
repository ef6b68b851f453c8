use std::path::Path;

use tracing::info;

use crate::application::{
    ApplicationError,
    ports::{Prompter, ServerStore},
    services::wizard::Wizard,
};
use crate::domain::WatchedProject;
use crate::error::SdkResult;

/// Keeps the list of projects a server redeploys from.
pub struct WatchService {
    store: Box<dyn ServerStore>,
    prompter: Box<dyn Prompter>,
}

impl WatchService {
    pub fn new(store: Box<dyn ServerStore>, prompter: Box<dyn Prompter>) -> Self {
        Self { store, prompter }
    }

    /// Start watching `project`. Returns `false` if it was already watched.
    pub fn watch(&self, server_id: Option<&str>, project: WatchedProject) -> SdkResult<bool> {
        let server_id = self.server_id(server_id)?;
        let mut server = self.store.load(&server_id)?;

        let added = server.add_watched_project(project.clone());
        if added {
            self.store.save(&server)?;
            info!(server_id = %server_id, project = %project.artifact_id, "Watching project");
        }
        Ok(added)
    }

    /// Stop watching the projects matching `selector`.
    ///
    /// `groupId:artifactId` is tried first, then the artifact id alone, then
    /// the project path.
    pub fn unwatch(
        &self,
        server_id: Option<&str>,
        selector: &str,
    ) -> SdkResult<Vec<WatchedProject>> {
        let server_id = self.server_id(server_id)?;
        let mut server = self.store.load(&server_id)?;

        let removed = select(&server.watched_projects, selector);
        if removed.is_empty() {
            return Err(ApplicationError::ProjectNotWatched {
                server_id,
                selector: selector.to_string(),
            }
            .into());
        }

        server.watched_projects.retain(|p| !removed.contains(p));
        self.store.save(&server)?;
        info!(server_id = %server_id, count = removed.len(), "Stopped watching");
        Ok(removed)
    }

    pub fn list(&self, server_id: Option<&str>) -> SdkResult<Vec<WatchedProject>> {
        let server_id = self.server_id(server_id)?;
        Ok(self.store.load(&server_id)?.watched_projects)
    }

    fn server_id(&self, value: Option<&str>) -> SdkResult<String> {
        Wizard::new(self.prompter.as_ref()).existing_server_or_prompt(value, self.store.as_ref())
    }
}

/// Projects matching `selector`, by the first rule that matches any.
fn select(projects: &[WatchedProject], selector: &str) -> Vec<WatchedProject> {
    let pick = |rule: &dyn Fn(&WatchedProject) -> bool| -> Vec<WatchedProject> {
        projects.iter().filter(|p| rule(p)).cloned().collect()
    };

    let by_coordinates =
        pick(&|p: &WatchedProject| format!("{}:{}", p.group_id, p.artifact_id) == selector);
    if !by_coordinates.is_empty() {
        return by_coordinates;
    }
    let by_artifact = pick(&|p: &WatchedProject| p.artifact_id == selector);
    if !by_artifact.is_empty() {
        return by_artifact;
    }
    pick(&|p: &WatchedProject| p.path == Path::new(selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{FakeStore, ScriptedPrompter};
    use crate::domain::ServerConfig;
    use crate::error::SdkError;

    fn service() -> (FakeStore, WatchService) {
        let store = FakeStore::default();
        store.save(&ServerConfig::new("demo")).unwrap();
        let service =
            WatchService::new(Box::new(store.clone()), Box::new(ScriptedPrompter::new(&[])));
        (store, service)
    }

    fn appui() -> WatchedProject {
        WatchedProject::new("org.openmrs.module", "appui", "/src/appui")
    }

    fn reporting() -> WatchedProject {
        WatchedProject::new("org.openmrs.module", "reporting", "/src/reporting")
    }

    #[test]
    fn watch_once() {
        let (store, service) = service();
        assert!(service.watch(Some("demo"), appui()).unwrap());
        assert!(!service.watch(Some("demo"), appui()).unwrap());
        assert_eq!(store.load("demo").unwrap().watched_projects, vec![appui()]);
    }

    #[test]
    fn unwatch_by_coordinates_artifact_or_path() {
        let (_, service) = service();
        service.watch(Some("demo"), appui()).unwrap();
        service.watch(Some("demo"), reporting()).unwrap();

        assert_eq!(
            service.unwatch(Some("demo"), "org.openmrs.module:appui").unwrap(),
            vec![appui()]
        );
        assert_eq!(
            service.unwatch(Some("demo"), "/src/reporting").unwrap(),
            vec![reporting()]
        );
        assert!(service.list(Some("demo")).unwrap().is_empty());

        service.watch(Some("demo"), appui()).unwrap();
        assert_eq!(service.unwatch(Some("demo"), "appui").unwrap(), vec![appui()]);
    }

    #[test]
    fn unwatch_unknown_fails() {
        let (_, service) = service();
        let err = service.unwatch(Some("demo"), "nothing").unwrap_err();
        assert!(matches!(
            err,
            SdkError::Application(ApplicationError::ProjectNotWatched { .. })
        ));
    }
}
