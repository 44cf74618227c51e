//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod container_runtime;
pub mod deploy_events;
pub mod env_bootstrap;
pub mod source_host;
pub mod state_repository;

pub use container_runtime::{ContainerRemoval, ContainerRuntime};
pub use deploy_events::{DeployEvent, DeployEventSink, DeployStep, NoopEventSink};
pub use env_bootstrap::{BootstrapOutcome, EnvBootstrap, NoopBootstrap};
pub use source_host::{SourceHost, SyncReport};
pub use state_repository::{InMemoryStateRepository, StateRepository};
