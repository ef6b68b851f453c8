//! Core domain layer.
//!
//! Pure logic over artifacts, versions and server descriptions. No I/O and
//! no logging happen here; services in `crate::application` drive the ports.
//!
//! - **Version ordering**: [`Version`] and [`compare_versions`]
//! - **Identity**: [`Artifact`] equality is `(group_id, artifact_id)`
//! - **Upgrades**: [`UpgradeDifferential::calculate`]

pub mod artifact;
pub mod database;
pub mod differential;
pub mod distribution;
pub mod error;
pub mod project;
pub mod server;
pub mod version;

mod validation;

pub use artifact::{
    Artifact, ArtifactKey, ArtifactType, GROUP_DISTRO, GROUP_MODULE, GROUP_OPENMRS, GROUP_WEB,
    compare_versions, with_omod_suffix,
};
pub use database::{DEFAULT_DB_USER, DatabaseConfig, DbDriver, add_mysql_params_if_missing};
pub use differential::UpgradeDifferential;
pub use distribution::{Distribution, DistributionRef};
pub use error::{DomainError, ErrorCategory};
pub use project::{ArchetypeRequest, ModuleProject, ProjectKind};
pub use server::{MODULES_DIR, SERVER_CONFIG_FILE, ServerConfig, WatchedProject, artifact_dir};
pub use validation::DomainValidator;
pub use version::Version;
