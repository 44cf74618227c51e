//! Domain Layer
//!
//! Deployment concepts without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - RepositoryRef, DeploymentTarget, WatchState
//! - `value_objects/` - Service, RepoSlug, CommitSha, OverrideSet
//! - `services/` - ChangeDetector (the STALE/SYNCED state machine)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never shells out or touches the network
//! 2. **Explicit state** - Watch state is passed in and returned, never global
//! 3. **Ports & Adapters** - All external calls go through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
