//! Application layer for the SDK.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (SetupService, DeployService, ...)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    DeployOutcome, DeployRequest, DeployService, InstallTarget, ModuleInstallOutcome,
    ModuleRequest, ModuleService, NOTHING_TO_UPGRADE, ProjectRequest, ProjectService,
    ServerService, SetupRequest, SetupService, UpgradeDecision, WatchService, Wizard,
};

pub use ports::{
    ArchetypeRunner, ArtifactRepository, DistributionSource, Filesystem, Prompter, ServerStore,
};

pub use error::ApplicationError;
