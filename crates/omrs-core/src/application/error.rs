//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No server directory with this id.
    #[error("Server '{id}' does not exist")]
    ServerNotFound { id: String },

    /// Setup target already taken.
    #[error("Server '{id}' already exists")]
    ServerExists { id: String },

    /// Artifact missing from the repository.
    #[error("Artifact {coordinates} not found (looked in {path})")]
    ArtifactNotFound { coordinates: String, path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Reading an answer failed.
    #[error("Prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// Batch mode ran out of answers for a question without a default.
    #[error("No answer available for '{prompt}'")]
    MissingAnswer { prompt: String },

    #[error("Module '{artifact_id}' is not installed on server '{server_id}'")]
    ModuleNotInstalled {
        server_id: String,
        artifact_id: String,
    },

    #[error("No watched project matches '{selector}' on server '{server_id}'")]
    ProjectNotWatched { server_id: String, selector: String },

    /// An external tool (mvn) could not be run or exited non-zero.
    #[error("Command '{command}' failed: {reason}")]
    ExternalCommandFailed { command: String, reason: String },

    /// Server configuration could not be read or written.
    #[error("Server store error: {reason}")]
    StoreError { reason: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ServerNotFound { id } => vec![
                format!("No server named '{id}'"),
                "Try: omrs list to see existing servers".into(),
                "Or create one with: omrs setup".into(),
            ],
            Self::ServerExists { id } => vec![
                format!("Choose another id than '{id}'"),
                "Or upgrade the existing server with: omrs deploy".into(),
            ],
            Self::ArtifactNotFound { path, .. } => vec![
                format!("Expected file: {}", path.display()),
                "Build or install the artifact into the local repository first".into(),
                "Check sdk.local_repository with: omrs config get sdk.local_repository".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::MissingAnswer { prompt } => vec![
                format!("Supply an answer for '{prompt}' in --batch-answers"),
                "Or run without --batch-answers to answer interactively".into(),
            ],
            Self::ModuleNotInstalled { server_id, .. } => vec![
                format!("Try: omrs info -s {server_id} to see installed modules"),
            ],
            Self::ProjectNotWatched { server_id, .. } => vec![
                format!("Try: omrs watch --list -s {server_id}"),
                "Match by groupId:artifactId, artifact id or project path".into(),
            ],
            Self::ExternalCommandFailed { command, .. } => vec![
                format!("Make sure '{command}' is installed and on PATH"),
                "Re-run with -vv to see the full command line".into(),
            ],
            Self::StoreError { .. } => vec![
                "The server.toml file may be damaged".into(),
                "Inspect it or recreate the server with: omrs setup".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ServerNotFound { .. }
            | Self::ArtifactNotFound { .. }
            | Self::ModuleNotInstalled { .. }
            | Self::ProjectNotWatched { .. } => ErrorCategory::NotFound,
            Self::ServerExists { .. } | Self::ValidationFailed(_) | Self::MissingAnswer { .. } => {
                ErrorCategory::Validation
            }
            Self::StoreError { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. }
            | Self::RollbackFailed { .. }
            | Self::PromptFailed { .. }
            | Self::ExternalCommandFailed { .. } => ErrorCategory::Internal,
        }
    }
}
