//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - One-shot redeploy (sync, bootstrap, build, swap containers, clean up)
//! - `WatchUseCase` - Polls for new commits and redeploys stale services

pub mod deploy;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

pub use deploy::{DeployOptions, DeployReport, DeployUseCase, StepFailure};
pub use watch::{TickOutcome, WatchEvent, WatchOptions, WatchUseCase};
