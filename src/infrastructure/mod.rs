//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process` - External command execution (`CommandRunner`)
//! - `github/` - GitHub source host (REST lookups, shallow-clone snapshots)
//! - `docker/` - Compose-backed container runtime
//! - `bootstrap` - Local venv / node environment setup
//! - `fs/` - Tree merge and runtime detection
//! - `repositories/` - Watch state persistence
//! - `events/` - Console and NDJSON event sinks

pub mod bootstrap;
pub mod docker;
pub mod events;
pub mod fs;
pub mod github;
pub mod process;
pub mod repositories;

// Re-export for convenience
pub use bootstrap::LocalEnvBootstrap;
pub use docker::{ComposeFlavor, DockerCliRuntime};
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::RuntimeProbe;
pub use github::GithubSourceHost;
pub use process::{CommandRunner, SystemRunner};
pub use repositories::TomlStateRepository;
