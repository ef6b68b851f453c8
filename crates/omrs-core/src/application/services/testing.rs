//! In-memory port fakes for service unit tests.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::{
    ApplicationError,
    ports::{ArtifactRepository, DistributionSource, Filesystem, Prompter, ServerStore},
};
use crate::domain::{Artifact, Distribution, ServerConfig};
use crate::error::SdkResult;

/// Answers questions from a fixed script and records the conversation.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
    shown: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, prompt: &str, default: Option<&str>) -> SdkResult<String> {
        self.asked.lock().unwrap().push(prompt.to_string());
        let answer = self.answers.lock().unwrap().pop_front();
        match (answer, default) {
            (Some(a), Some(d)) if a.trim().is_empty() => Ok(d.to_string()),
            (Some(a), _) => Ok(a),
            (None, Some(d)) => Ok(d.to_string()),
            (None, None) => Err(ApplicationError::MissingAnswer {
                prompt: prompt.to_string(),
            }
            .into()),
        }
    }

    fn show(&self, message: &str) {
        self.shown.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
struct FsState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

/// Shared in-memory filesystem.
#[derive(Clone, Default)]
pub struct FakeFs {
    state: Arc<Mutex<FsState>>,
}

impl FakeFs {
    pub fn files(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }

    pub fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().unwrap().files.contains_key(path.as_ref())
    }

    /// Every file with its content.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        self.state.lock().unwrap().files.clone()
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> SdkResult<()> {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors() {
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> SdkResult<()> {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> SdkResult<()> {
        match self.state.lock().unwrap().files.remove(path) {
            Some(_) => Ok(()),
            None => Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            }
            .into()),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> SdkResult<()> {
        let mut state = self.state.lock().unwrap();
        let content = state.files.remove(from).ok_or_else(|| ApplicationError::FilesystemError {
            path: from.to_path_buf(),
            reason: "no such file".into(),
        })?;
        state.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.contains(path) || state.files.contains_key(path)
    }

    fn list_dir(&self, path: &Path) -> SdkResult<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        let children = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }

    fn remove_dir_all(&self, path: &Path) -> SdkResult<()> {
        let mut state = self.state.lock().unwrap();
        state.dirs.retain(|p| !p.starts_with(path));
        state.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

/// In-memory server store; the last saved server is the most recent.
#[derive(Clone, Default)]
pub struct FakeStore {
    servers: Arc<Mutex<Vec<ServerConfig>>>,
}

impl FakeStore {
    pub fn root() -> PathBuf {
        PathBuf::from("/servers")
    }
}

impl ServerStore for FakeStore {
    fn exists(&self, server_id: &str) -> bool {
        self.servers
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.server_id == server_id)
    }

    fn load(&self, server_id: &str) -> SdkResult<ServerConfig> {
        self.servers
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.server_id == server_id)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::ServerNotFound {
                    id: server_id.to_string(),
                }
                .into()
            })
    }

    fn save(&self, config: &ServerConfig) -> SdkResult<()> {
        let mut servers = self.servers.lock().unwrap();
        servers.retain(|s| s.server_id != config.server_id);
        servers.push(config.clone());
        Ok(())
    }

    fn list(&self) -> SdkResult<Vec<String>> {
        Ok(self
            .servers
            .lock()
            .unwrap()
            .iter()
            .rev()
            .map(|s| s.server_id.clone())
            .collect())
    }

    fn server_dir(&self, server_id: &str) -> PathBuf {
        Self::root().join(server_id)
    }
}

/// Repository that "installs" by writing the coordinates into the fake
/// filesystem. Artifacts listed in `missing` are not found.
#[derive(Clone, Default)]
pub struct FakeRepository {
    pub fs: FakeFs,
    pub missing: Vec<String>,
}

impl ArtifactRepository for FakeRepository {
    fn resolve(&self, artifact: &Artifact) -> SdkResult<PathBuf> {
        let path = PathBuf::from("/repo").join(artifact.dest_file_name());
        if self.missing.contains(&artifact.artifact_id) {
            return Err(ApplicationError::ArtifactNotFound {
                coordinates: artifact.coordinates(),
                path,
            }
            .into());
        }
        Ok(path)
    }

    fn install(&self, artifact: &Artifact, dest_dir: &Path) -> SdkResult<PathBuf> {
        self.resolve(artifact)?;
        let dest = dest_dir.join(artifact.dest_file_name());
        self.fs.create_dir_all(dest_dir)?;
        self.fs.write_file(&dest, artifact.coordinates().as_bytes())?;
        Ok(dest)
    }
}

#[derive(Clone, Default)]
pub struct FakeDistributions {
    pub manifests: HashMap<String, Distribution>,
}

impl DistributionSource for FakeDistributions {
    fn load(&self, reference: &str) -> SdkResult<Distribution> {
        self.manifests.get(reference).cloned().ok_or_else(|| {
            ApplicationError::ArtifactNotFound {
                coordinates: reference.to_string(),
                path: PathBuf::from(reference),
            }
            .into()
        })
    }
}
