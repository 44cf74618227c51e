//! Local environment bootstrap
//!
//! Only used when the agent runs directly on a host: prepares a Python
//! virtualenv for the backend and node dependencies for the frontend.
//! Every step checks for existing state first, so reruns are cheap.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::RepositoryRef;
use crate::domain::ports::{BootstrapOutcome, EnvBootstrap};
use crate::domain::value_objects::Service;
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::RuntimeProbe;
use crate::infrastructure::process::{CommandOutput, CommandRunner, CommandSpec};

const VENV_DIR: &str = "venv";

/// Upper bound for one install or build command
pub const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(1800);

pub struct LocalEnvBootstrap {
    runner: Arc<dyn CommandRunner>,
    probe: RuntimeProbe,
    backend_port: u16,
}

impl LocalEnvBootstrap {
    pub fn new(runner: Arc<dyn CommandRunner>, probe: RuntimeProbe, backend_port: u16) -> Self {
        Self {
            runner,
            probe,
            backend_port,
        }
    }

    fn run(&self, service: Service, cmd: &CommandSpec) -> DeployResult<CommandOutput> {
        let cmd = &cmd.clone().timeout(BOOTSTRAP_TIMEOUT);
        self.runner.run(cmd).map_err(|e| DeployError::Bootstrap {
            service,
            message: format!("could not run '{}': {}", cmd, e),
        })
    }

    fn run_checked(&self, service: Service, cmd: CommandSpec) -> DeployResult<String> {
        let out = self.run(service, &cmd)?;
        if out.success() {
            Ok(cmd.to_string())
        } else {
            Err(DeployError::Bootstrap {
                service,
                message: format!("'{}' failed with {}", cmd, out.describe_failure()),
            })
        }
    }

    fn backend(&self, dir: &Path) -> DeployResult<Vec<String>> {
        let mut actions = Vec::new();

        if !dir.join(VENV_DIR).is_dir() {
            let venv = CommandSpec::new("python3")
                .args(["-m", "venv", VENV_DIR])
                .current_dir(dir);
            actions.push(self.run_checked(Service::Backend, venv)?);
        }

        if dir.join("requirements.txt").is_file() {
            let pip = dir.join(VENV_DIR).join("bin").join("pip");
            let install = CommandSpec::new(pip.to_string_lossy())
                .args(["install", "-r", "requirements.txt"])
                .current_dir(dir);
            actions.push(self.run_checked(Service::Backend, install)?);
        }

        Ok(actions)
    }

    fn frontend(&self, dir: &Path) -> DeployResult<Vec<String>> {
        if !self.runner.is_available("node", &["--version"]) {
            return Err(DeployError::Bootstrap {
                service: Service::Frontend,
                message: "node is not installed or not on PATH".to_string(),
            });
        }

        let mut actions = Vec::new();
        if !dir.join("package.json").is_file() {
            tracing::warn!(dir = %dir.display(), "no package.json, skipping frontend install");
            return Ok(actions);
        }

        if !dir.join("node_modules").is_dir() {
            actions.push(self.npm_install(dir)?);
        }

        let api_base = format!("http://backend:{}/api", self.backend_port);
        let build = CommandSpec::new("npm")
            .args(["run", "build"])
            .current_dir(dir)
            .env("NEXT_PUBLIC_API_BASE_URL", api_base);
        let out = self.run(Service::Frontend, &build)?;
        if out.success() {
            actions.push(build.to_string());
        } else {
            tracing::warn!(
                "frontend build failed, continuing: {}",
                out.describe_failure()
            );
            actions.push(format!("{} (failed, ignored)", build));
        }

        Ok(actions)
    }

    /// `npm install --force`, retried once with `--legacy-peer-deps`
    fn npm_install(&self, dir: &Path) -> DeployResult<String> {
        let forced = CommandSpec::new("npm")
            .args(["install", "--force"])
            .current_dir(dir);
        let out = self.run(Service::Frontend, &forced)?;
        if out.success() {
            return Ok(forced.to_string());
        }

        tracing::warn!(
            "'{}' failed ({}), retrying with --legacy-peer-deps",
            forced,
            out.describe_failure()
        );
        let legacy = CommandSpec::new("npm")
            .args(["install", "--legacy-peer-deps"])
            .current_dir(dir);
        self.run_checked(Service::Frontend, legacy)
    }
}

impl EnvBootstrap for LocalEnvBootstrap {
    fn bootstrap(&self, repo: &RepositoryRef) -> DeployResult<BootstrapOutcome> {
        if self.probe.is_containerized() {
            return Ok(BootstrapOutcome::Skipped {
                reason: "running inside a container".to_string(),
            });
        }

        let actions = match repo.service {
            Service::Backend => self.backend(&repo.local_path)?,
            Service::Frontend => self.frontend(&repo.local_path)?,
        };
        Ok(BootstrapOutcome::Prepared { actions })
    }
}
