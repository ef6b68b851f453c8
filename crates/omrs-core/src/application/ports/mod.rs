//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `omrs-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `Prompter`: Questions and answers
//!   - `ServerStore`: Server configuration persistence
//!   - `ArtifactRepository`: Artifact lookup and installation
//!   - `DistributionSource`: Distribution manifests
//!   - `ArchetypeRunner`: Project generation
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ArchetypeRunner, ArtifactRepository, DistributionSource, Filesystem, Prompter, ServerStore,
};

#[cfg(test)]
pub use output::MockArchetypeRunner;
