//! Docker Container Runtime
//!
//! Implements the ContainerRuntime port via the docker CLI.
//! Compose v2 (`docker compose`) is preferred, v1 (`docker-compose`) is the fallback.

mod compose;
mod runtime;

pub use compose::ComposeFlavor;
pub use runtime::DockerCliRuntime;
