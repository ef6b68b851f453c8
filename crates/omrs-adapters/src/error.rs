//! Adapter I/O errors and their mapping into core errors.

use std::io;
use std::path::PathBuf;

use omrs_core::application::ApplicationError;
use omrs_core::error::SdkError;
use thiserror::Error;

/// Failure inside an adapter, before it is reported through a port.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

impl AdapterError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<AdapterError> for SdkError {
    fn from(e: AdapterError) -> Self {
        match e {
            AdapterError::Io {
                operation,
                path,
                source,
            } => ApplicationError::FilesystemError {
                path,
                reason: format!("Failed to {operation}: {source}"),
            }
            .into(),
            AdapterError::Parse { path, reason } => ApplicationError::StoreError {
                reason: format!("{}: {reason}", path.display()),
            }
            .into(),
        }
    }
}
