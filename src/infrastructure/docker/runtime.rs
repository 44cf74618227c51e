//! Docker CLI Runtime
//!
//! Implements `ContainerRuntime` by shelling out to docker and compose.
//! All compose calls use the fixed project name and run in the compose
//! directory, so the namespace never follows the working directory name.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::domain::entities::DeploymentTarget;
use crate::domain::ports::{ContainerRemoval, ContainerRuntime};
use crate::domain::value_objects::Service;
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::process::{CommandOutput, CommandRunner, CommandSpec};

use super::compose::ComposeFlavor;

/// Upper bound for `compose build`
pub const BUILD_TIMEOUT: Duration = Duration::from_secs(1800);
/// Upper bound for every other docker call
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

pub struct DockerCliRuntime {
    runner: Arc<dyn CommandRunner>,
    target: DeploymentTarget,
    flavor: OnceLock<ComposeFlavor>,
}

impl DockerCliRuntime {
    pub fn new(runner: Arc<dyn CommandRunner>, target: DeploymentTarget) -> Self {
        Self {
            runner,
            target,
            flavor: OnceLock::new(),
        }
    }

    fn flavor(&self) -> DeployResult<ComposeFlavor> {
        if let Some(flavor) = self.flavor.get() {
            return Ok(*flavor);
        }
        let detected = ComposeFlavor::detect(self.runner.as_ref())?;
        tracing::info!(compose = detected.name(), "using compose");
        Ok(*self.flavor.get_or_init(|| detected))
    }

    fn compose(&self) -> DeployResult<CommandSpec> {
        let mut cmd = self
            .flavor()?
            .command(&self.target.project_name, &self.target.compose_file)
            .current_dir(&self.target.compose_dir)
            .timeout(COMMAND_TIMEOUT)
            .env("PORT", self.target.backend_port.to_string());
        if let Some(platform) = &self.target.build_platform {
            cmd = cmd.env("DOCKER_DEFAULT_PLATFORM", platform);
        }
        Ok(cmd)
    }

    fn run(&self, cmd: &CommandSpec) -> DeployResult<CommandOutput> {
        self.runner.run(cmd).map_err(|e| DeployError::Runtime {
            message: format!("could not run '{}': {}", cmd, e),
        })
    }

    fn ensure_network(&self) -> DeployResult<()> {
        let network = &self.target.network_name;
        if self
            .runner
            .is_available("docker", &["network", "inspect", network.as_str()])
        {
            return Ok(());
        }

        tracing::info!(network = %network, "creating network");
        let create = CommandSpec::new("docker")
            .args(["network", "create", network.as_str()])
            .timeout(COMMAND_TIMEOUT);
        let out = self.run(&create)?;
        if out.success() {
            Ok(())
        } else {
            Err(DeployError::Runtime {
                message: format!(
                    "could not create network {}: {}",
                    network,
                    out.describe_failure()
                ),
            })
        }
    }
}

fn service_names(services: &[Service]) -> Vec<&'static str> {
    services.iter().map(Service::compose_name).collect()
}

fn is_missing_container(out: &CommandOutput) -> bool {
    let stderr = out.stderr.to_lowercase();
    stderr.contains("no such container") || stderr.contains("not found")
}

impl ContainerRuntime for DockerCliRuntime {
    fn container_name(&self, service: Service) -> String {
        self.target.container_name(service).to_string()
    }

    fn preflight(&self) -> DeployResult<()> {
        self.flavor()?;
        let compose_file = self.target.compose_file_path();
        if !compose_file.is_file() {
            return Err(DeployError::ComposeFileMissing { path: compose_file });
        }
        Ok(())
    }

    fn build_images(&self, services: &[Service]) -> DeployResult<()> {
        let mut cmd = self.compose()?.arg("build");
        if self.flavor()? == ComposeFlavor::V1 && services.len() > 1 {
            cmd = cmd.arg("--parallel");
        }
        let cmd = cmd.args(service_names(services)).timeout(BUILD_TIMEOUT);

        let out = self.runner.run(&cmd).map_err(|e| DeployError::Build {
            message: format!("could not run '{}': {}", cmd, e),
        })?;
        if out.success() {
            Ok(())
        } else {
            Err(DeployError::Build {
                message: format!("'{}' failed with {}", cmd, out.describe_failure()),
            })
        }
    }

    fn stop_container(&self, service: Service) -> DeployResult<ContainerRemoval> {
        let name = self.target.container_name(service).to_string();

        let stop = CommandSpec::new("docker")
            .args(["stop", name.as_str()])
            .timeout(COMMAND_TIMEOUT);
        let stopped = self.run(&stop)?;
        if !stopped.success() {
            tracing::debug!(container = %name, "stop failed: {}", stopped.describe_failure());
        }

        let rm = CommandSpec::new("docker")
            .args(["rm", "-f", name.as_str()])
            .timeout(COMMAND_TIMEOUT);
        let removed = self.run(&rm)?;
        if removed.success() {
            Ok(ContainerRemoval::Removed)
        } else if is_missing_container(&removed) {
            Ok(ContainerRemoval::NotPresent)
        } else {
            Err(DeployError::Runtime {
                message: format!("could not remove {}: {}", name, removed.describe_failure()),
            })
        }
    }

    fn start_services(&self, services: &[Service]) -> DeployResult<()> {
        self.ensure_network()?;
        let cmd = self
            .compose()?
            .args(["up", "-d", "--no-deps", "--force-recreate"])
            .args(service_names(services));

        let out = self.run(&cmd)?;
        if out.success() {
            Ok(())
        } else {
            Err(DeployError::Runtime {
                message: format!("'{}' failed with {}", cmd, out.describe_failure()),
            })
        }
    }

    fn remove_unused_images(&self, services: &[Service]) -> DeployResult<()> {
        let cmd = CommandSpec::new("docker")
            .args(["image", "prune", "-f", "--filter", "dangling=true"])
            .timeout(COMMAND_TIMEOUT);
        let out = self.run(&cmd)?;
        if out.success() {
            tracing::debug!(
                images = ?services.iter().map(|s| self.target.image_name(*s)).collect::<Vec<_>>(),
                "pruned dangling images"
            );
            Ok(())
        } else {
            Err(DeployError::Runtime {
                message: format!("image prune failed with {}", out.describe_failure()),
            })
        }
    }
}
