//! Deployment target entity
//!
//! The fixed compose namespace both services are deployed into.

use std::path::PathBuf;

use crate::domain::value_objects::Service;

/// Compose project, network, and per-service container/image names
///
/// Both services always share `project_name` and `network_name`, so the
/// namespace never depends on the name of the enclosing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub project_name: String,
    pub network_name: String,
    pub frontend_container: String,
    pub backend_container: String,
    /// Directory compose commands run in
    pub compose_dir: PathBuf,
    /// Compose file name, relative to `compose_dir`
    pub compose_file: String,
    /// Optional `--platform` override for image builds
    pub build_platform: Option<String>,
    /// Backend bind port, passed to compose as `PORT`
    pub backend_port: u16,
}

impl DeploymentTarget {
    pub fn container_name(&self, service: Service) -> &str {
        match service {
            Service::Frontend => &self.frontend_container,
            Service::Backend => &self.backend_container,
        }
    }

    /// Image tag compose assigns to a service's build
    pub fn image_name(&self, service: Service) -> String {
        format!("{}-{}", self.project_name, service.compose_name())
    }

    pub fn compose_file_path(&self) -> PathBuf {
        self.compose_dir.join(&self.compose_file)
    }
}
