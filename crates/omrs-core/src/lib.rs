//! omrs Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the `omrs`
//! server SDK: version ordering, artifact identity, upgrade differentials,
//! and the use cases that set up, deploy and upgrade local servers.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             omrs-cli (CLI)              │
//! │       (Implements Driving Ports)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │  (SetupService, DeployService, Wizard)  │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │  (ServerStore, ArtifactRepository, ...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     omrs-adapters (Infrastructure)      │
//! │ (TomlServerStore, LocalRepository, ...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (Version, Artifact, UpgradeDifferential)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use omrs_core::domain::{Artifact, UpgradeDifferential};
//!
//! let installed = vec![Artifact::platform("1.11.5"), Artifact::new("appui-omod", "1.0")];
//! let desired = vec![Artifact::platform("2.0.0"), Artifact::new("appui-omod", "1.1")];
//!
//! let diff = UpgradeDifferential::calculate(&installed, &desired).unwrap();
//! assert_eq!(diff.platform_artifact.unwrap().version, "2.0.0");
//! assert_eq!(diff.update_old_to_new.len(), 1);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DeployOutcome, DeployRequest, DeployService, ModuleInstallOutcome, ModuleRequest,
        ModuleService, ProjectRequest, ProjectService, ServerService, SetupRequest, SetupService,
        WatchService,
        ports::{
            ArchetypeRunner, ArtifactRepository, DistributionSource, Filesystem, Prompter,
            ServerStore,
        },
    };
    pub use crate::domain::{
        ArchetypeRequest, Artifact, ArtifactType, DatabaseConfig, DbDriver, Distribution,
        ModuleProject, ProjectKind, ServerConfig, UpgradeDifferential, Version, WatchedProject,
    };
    pub use crate::error::{SdkError, SdkResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
