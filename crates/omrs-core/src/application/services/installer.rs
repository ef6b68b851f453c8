//! Copying artifacts into a server directory with rollback.
//!
//! Files being replaced are kept as `<name>.bak` until every artifact of
//! the batch is in place.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::application::ports::{ArtifactRepository, Filesystem};
use crate::domain::{Artifact, artifact_dir};
use crate::error::SdkResult;

/// Installs artifacts into a server and undoes its own writes on failure.
pub(crate) struct Installer<'a> {
    repository: &'a dyn ArtifactRepository,
    filesystem: &'a dyn Filesystem,
}

impl<'a> Installer<'a> {
    pub(crate) fn new(
        repository: &'a dyn ArtifactRepository,
        filesystem: &'a dyn Filesystem,
    ) -> Self {
        Self {
            repository,
            filesystem,
        }
    }

    /// Install every artifact into its directory under `server_dir`.
    ///
    /// A file already at an install target is moved aside first. If one
    /// install fails, files written by this call are removed, the moved
    /// files are put back and the error is returned.
    pub(crate) fn install_all(
        &self,
        server_dir: &Path,
        artifacts: &[&Artifact],
    ) -> SdkResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        let mut backups = Vec::new();

        for artifact in artifacts {
            let dir = artifact_dir(server_dir, artifact);
            let target = dir.join(artifact.dest_file_name());

            if self.filesystem.exists(&target) {
                let backup = backup_path(&target);
                if let Err(e) = self.filesystem.rename(&target, &backup) {
                    self.rollback(&written, &backups);
                    return Err(e);
                }
                backups.push((target, backup));
            }

            match self.repository.install(artifact, &dir) {
                Ok(path) => {
                    debug!(artifact = %artifact, path = %path.display(), "Installed");
                    written.push(path);
                }
                Err(e) => {
                    warn!(artifact = %artifact, error = %e, "Install failed, rolling back");
                    self.rollback(&written, &backups);
                    return Err(e);
                }
            }
        }

        for (_, backup) in &backups {
            if let Err(e) = self.filesystem.remove_file(backup) {
                warn!(error = %e, path = %backup.display(), "Could not remove backup");
            }
        }

        info!(count = written.len(), "Artifacts installed");
        Ok(written)
    }

    /// Remove the installed file of `artifact` if it is there.
    pub(crate) fn remove(&self, server_dir: &Path, artifact: &Artifact) -> SdkResult<()> {
        let path = artifact_dir(server_dir, artifact).join(artifact.dest_file_name());
        if self.filesystem.exists(&path) {
            self.filesystem.remove_file(&path)?;
            debug!(path = %path.display(), "Removed");
        }
        Ok(())
    }

    /// Best-effort rollback: drop what was written, restore what was moved.
    fn rollback(&self, written: &[PathBuf], backups: &[(PathBuf, PathBuf)]) {
        for path in written {
            if let Err(e) = self.filesystem.remove_file(path) {
                warn!(error = %e, path = %path.display(), "Rollback failed");
            }
        }
        for (target, backup) in backups.iter().rev() {
            if let Err(e) = self.filesystem.rename(backup, target) {
                warn!(
                    error = %e,
                    path = %target.display(),
                    "Could not restore previous file"
                );
            }
        }
    }
}

/// Where an existing install target waits while its replacement is copied.
fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    target.with_file_name(name)
}
