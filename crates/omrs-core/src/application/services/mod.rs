//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "set up a server" or "deploy a distribution".

pub mod deploy;
pub(crate) mod installer;
pub mod module;
pub mod presenter;
pub mod project;
pub mod server;
pub mod setup;
pub mod watch;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use deploy::{DeployOutcome, DeployRequest, DeployService};
pub use module::{ModuleInstallOutcome, ModuleRequest, ModuleService};
pub use presenter::{NOTHING_TO_UPGRADE, UpgradeDecision};
pub use project::{ProjectRequest, ProjectService};
pub use server::ServerService;
pub use setup::{SetupRequest, SetupService};
pub use watch::WatchService;
pub use wizard::{InstallTarget, Wizard};
