//! Configuration module for deploy-agent
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (after `.env.local`)
//! 3. `deploy-agent.toml` in the base directory, or `--config`
//! 4. Built-in defaults (lowest priority)

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{
    load, load_env_file, load_with_warnings, parse_interval, with_env_overrides, ConfigWarning,
    CONFIG_FILE, ENV_FILE,
};
pub use types::{
    Config, DeploymentConfig, RepositoriesConfig, Secret, SyncConfig, WatchConfig,
    DEFAULT_BACKEND_PORT, DEFAULT_POLL_INTERVAL_SECS,
};
