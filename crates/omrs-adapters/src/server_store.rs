//! Server configurations stored as `<servers root>/<id>/server.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use omrs_core::{
    application::ports::ServerStore,
    domain::{SERVER_CONFIG_FILE, ServerConfig},
    error::{Context, SdkResult},
};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::error::AdapterError;

#[derive(Debug, Clone)]
pub struct TomlServerStore {
    root: PathBuf,
}

impl TomlServerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn config_path(&self, server_id: &str) -> PathBuf {
        self.server_dir(server_id).join(SERVER_CONFIG_FILE)
    }
}

impl ServerStore for TomlServerStore {
    fn exists(&self, server_id: &str) -> bool {
        self.config_path(server_id).is_file()
    }

    #[instrument(skip(self))]
    fn load(&self, server_id: &str) -> SdkResult<ServerConfig> {
        let path = self.config_path(server_id);
        if !path.is_file() {
            return Err(omrs_core::application::ApplicationError::ServerNotFound {
                id: server_id.to_string(),
            }
            .into());
        }

        let raw = fs::read_to_string(&path).map_err(|e| AdapterError::io("read", &path, e))?;
        let mut config: ServerConfig = toml::from_str(&raw).map_err(|e| AdapterError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        if config.server_id != server_id {
            warn!(stored = %config.server_id, "Server id in file differs from its directory");
            config.server_id = server_id.to_string();
        }
        Ok(config)
    }

    #[instrument(skip_all, fields(server_id = %config.server_id))]
    fn save(&self, config: &ServerConfig) -> SdkResult<()> {
        let dir = self.server_dir(&config.server_id);
        fs::create_dir_all(&dir).map_err(|e| AdapterError::io("create directory", &dir, e))?;

        let content = toml::to_string_pretty(config).context("serializing server configuration")?;
        let path = dir.join(SERVER_CONFIG_FILE);
        fs::write(&path, content).map_err(|e| AdapterError::io("write", &path, e))?;
        debug!(path = %path.display(), "Saved server configuration");
        Ok(())
    }

    fn list(&self) -> SdkResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut servers: Vec<(SystemTime, String)> = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| AdapterError::Parse {
                path: self.root.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let config = entry.path().join(SERVER_CONFIG_FILE);
            let Ok(metadata) = fs::metadata(&config) else {
                continue;
            };
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            servers.push((modified, entry.file_name().to_string_lossy().into_owned()));
        }

        servers.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(servers.into_iter().map(|(_, id)| id).collect())
    }

    fn server_dir(&self, server_id: &str) -> PathBuf {
        self.root.join(server_id)
    }
}
