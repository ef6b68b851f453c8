//! Infrastructure adapters for omrs.
//!
//! This crate implements the ports defined in `omrs-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod archetype;
pub mod distribution;
pub mod error;
pub mod filesystem;
pub mod prompter;
pub mod repository;
pub mod server_store;

// Re-export commonly used adapters
pub use archetype::MavenArchetypeRunner;
pub use distribution::TomlDistributionSource;
pub use error::AdapterError;
pub use filesystem::LocalFilesystem;
pub use prompter::{BatchPrompter, StdioPrompter};
pub use repository::LocalRepository;
pub use server_store::TomlServerStore;
