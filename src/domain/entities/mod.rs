//! Domain Entities
//!
//! - `RepositoryRef` - A remote repository and its local checkout
//! - `DeploymentTarget` - The fixed compose namespace services run in
//! - `WatchState` - Deployed vs. observed commit per repository

mod deployment;
mod repository;
mod watch_state;

pub use deployment::DeploymentTarget;
pub use repository::RepositoryRef;
pub use watch_state::{RepoState, TrackedRepo, WatchState};
