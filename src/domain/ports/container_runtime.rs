//! Container runtime port
//!
//! The narrow set of runtime operations a redeploy needs. Implementations
//! shell out to docker / compose; tests substitute a recording fake.

use crate::domain::value_objects::Service;
use crate::error::DeployResult;

/// What happened when removing a service's container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRemoval {
    Removed,
    NotPresent,
}

/// Container runtime operations, each a synchronous external call
pub trait ContainerRuntime {
    /// Name of the container running `service`
    fn container_name(&self, service: Service) -> String {
        service.compose_name().to_string()
    }

    /// Check the runtime is usable before any state changes
    fn preflight(&self) -> DeployResult<()> {
        Ok(())
    }

    /// Build images for `services` (old containers keep running)
    fn build_images(&self, services: &[Service]) -> DeployResult<()>;

    /// Stop and remove the container for `service`, if it exists
    fn stop_container(&self, service: Service) -> DeployResult<ContainerRemoval>;

    /// Create and start containers for `services` on the fixed network
    fn start_services(&self, services: &[Service]) -> DeployResult<()>;

    /// Remove images superseded by the new build
    fn remove_unused_images(&self, services: &[Service]) -> DeployResult<()>;
}
