//! deploy-agent - keeps a two-service Docker Compose deployment current
//!
//! Pulls the frontend and backend repositories from GitHub, merges them into
//! local checkouts without clobbering local overrides, rebuilds images, and
//! swaps containers. The watcher polls for new commits and redeploys only
//! what changed.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod ui;

// Re-exports for convenience
pub use config::Config;
pub use domain::value_objects::Service;
pub use error::{DeployError, DeployResult, ErrorKind};
