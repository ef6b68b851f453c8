//! Local filesystem adapter using std::fs.

use std::path::{Path, PathBuf};

use omrs_core::{application::ports::Filesystem, error::SdkResult};

use crate::error::AdapterError;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SdkResult<()> {
        std::fs::create_dir_all(path).map_err(|e| AdapterError::io("create directory", path, e))?;
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> SdkResult<()> {
        std::fs::write(path, content).map_err(|e| AdapterError::io("write file", path, e))?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> SdkResult<()> {
        std::fs::remove_file(path).map_err(|e| AdapterError::io("remove file", path, e))?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> SdkResult<()> {
        std::fs::rename(from, to).map_err(|e| AdapterError::io("rename file", from, e))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> SdkResult<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = std::fs::read_dir(path)
            .map_err(|e| AdapterError::io("read directory", path, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdapterError::io("read directory", path, e))?;
        entries.sort();
        Ok(entries)
    }

    fn remove_dir_all(&self, path: &Path) -> SdkResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| AdapterError::io("remove directory", path, e))?;
        Ok(())
    }
}
