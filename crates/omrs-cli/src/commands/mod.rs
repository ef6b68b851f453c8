//! Command handlers.
//!
//! Each handler translates arguments into a core request, runs the service
//! built from the adapters below, and renders the result.  No business logic
//! lives here.

pub mod completions;
pub mod config;
pub mod create_project;
pub mod deploy;
pub mod info;
pub mod init;
pub mod list;
pub mod module;
pub mod setup;
pub mod watch;

use omrs_adapters::{LocalFilesystem, LocalRepository, TomlDistributionSource, TomlServerStore};
use omrs_core::application::ports::{ArtifactRepository, DistributionSource, Filesystem, ServerStore};

use crate::config::AppConfig;

fn store(config: &AppConfig) -> Box<dyn ServerStore> {
    Box::new(TomlServerStore::new(&config.sdk.servers_path))
}

fn local_repository(config: &AppConfig) -> LocalRepository {
    LocalRepository::new(&config.sdk.local_repository)
}

fn repository(config: &AppConfig) -> Box<dyn ArtifactRepository> {
    Box::new(local_repository(config))
}

fn distributions(config: &AppConfig) -> Box<dyn DistributionSource> {
    Box::new(TomlDistributionSource::new(local_repository(config)))
}

fn filesystem() -> Box<dyn Filesystem> {
    Box::new(LocalFilesystem::new())
}
