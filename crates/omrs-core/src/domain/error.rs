// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the CLI formats them more than once)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid version format: '{input}'")]
    InvalidVersionFormat { input: String },

    #[error("Invalid artifact coordinates '{input}': expected artifactId:version or groupId:artifactId:version")]
    InvalidCoordinates { input: String },

    #[error("Unknown artifact type '{0}'")]
    UnknownArtifactType(String),

    #[error("Invalid server id '{id}': {reason}")]
    InvalidServerId { id: String, reason: String },

    #[error("Invalid module id '{0}': must start with a letter and contain only lowercase alphanumerics and dots")]
    InvalidModuleId(String),

    #[error("Invalid module name '{0}': must start with a letter and contain only alphanumerics, dots and spaces")]
    InvalidModuleName(String),

    #[error("Invalid group id '{0}': must start with a letter and contain only lowercase alphanumerics and dots")]
    InvalidGroupId(String),

    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    // ========================================================================
    // Consistency Errors
    // ========================================================================
    #[error("Artifact '{key}' is listed more than once")]
    DuplicateArtifact { key: String },

    #[error("Distribution lists more than one platform artifact: {first} and {second}")]
    AmbiguousPlatform { first: String, second: String },

    #[error("Unknown database driver '{0}'")]
    UnknownDatabaseDriver(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVersionFormat { input } => vec![
                format!("'{input}' is not a dotted numeric version"),
                "Versions look like 1.11.6 or 2.3".into(),
            ],
            Self::InvalidCoordinates { .. } => vec![
                "Use artifactId:version, e.g. referenceapplication:2.3.1".into(),
                "Or groupId:artifactId:version, e.g. org.openmrs.distro:refapp:2.3".into(),
            ],
            Self::InvalidServerId { .. } => vec![
                "Server ids are directory names under the servers path".into(),
                "Examples: server, server1, demo".into(),
            ],
            Self::InvalidModuleId(_) => vec![
                "Examples: webservices.rest, metadatasharing, reporting".into(),
            ],
            Self::DuplicateArtifact { key } => vec![
                format!("Remove the duplicate entries for {key}"),
                "Each groupId:artifactId may appear only once".into(),
            ],
            Self::AmbiguousPlatform { .. } => vec![
                "A distribution may contain a single war artifact".into(),
            ],
            Self::UnknownDatabaseDriver(_) => vec![
                "Supported drivers: h2, mysql, postgresql".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateArtifact { .. } | Self::AmbiguousPlatform { .. } => {
                ErrorCategory::Consistency
            }
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Consistency,
    Internal,
}
