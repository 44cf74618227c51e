//! Configuration type definitions

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::DeploymentTarget;
use crate::domain::value_objects::{OverrideSet, Service};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_BACKEND_PORT: u16 = 8000;

/// Remote repository URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoriesConfig {
    pub frontend: Option<String>,
    pub backend: Option<String>,
}

/// Compose namespace and build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub project_name: String,
    pub network_name: String,
    pub frontend_container: String,
    pub backend_container: String,
    pub compose_file: String,
    pub build_platform: Option<String>,
    pub backend_port: u16,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            project_name: "jalindeploy".to_string(),
            network_name: "jalin-network".to_string(),
            frontend_container: "jalin-frontend".to_string(),
            backend_container: "jalin-backend".to_string(),
            compose_file: "docker-compose.yml".to_string(),
            build_platform: None,
            backend_port: DEFAULT_BACKEND_PORT,
        }
    }
}

/// Watcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub poll_interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

/// Repository sync settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// File names never overwritten by a sync when present locally
    pub preserve: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            preserve: OverrideSet::DEFAULT_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// A value that must never show up in logs or debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repositories: RepositoriesConfig,
    pub deployment: DeploymentConfig,
    pub watch: WatchConfig,
    pub sync: SyncConfig,

    /// Only ever read from the environment
    #[serde(skip)]
    pub github_token: Option<Secret>,
}

impl Config {
    pub fn repo_url(&self, service: Service) -> Option<&str> {
        let url = match service {
            Service::Frontend => &self.repositories.frontend,
            Service::Backend => &self.repositories.backend,
        };
        url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn token(&self) -> Option<String> {
        self.github_token
            .as_ref()
            .map(|s| s.expose().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn overrides(&self) -> OverrideSet {
        OverrideSet::new(self.sync.preserve.iter().cloned())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.watch.poll_interval_secs)
    }

    /// Deployment target rooted at `compose_dir`
    pub fn deployment_target(&self, compose_dir: PathBuf) -> DeploymentTarget {
        let d = &self.deployment;
        DeploymentTarget {
            project_name: d.project_name.clone(),
            network_name: d.network_name.clone(),
            frontend_container: d.frontend_container.clone(),
            backend_container: d.backend_container.clone(),
            compose_dir,
            compose_file: d.compose_file.clone(),
            build_platform: d.build_platform.clone().filter(|p| !p.is_empty()),
            backend_port: d.backend_port,
        }
    }
}
