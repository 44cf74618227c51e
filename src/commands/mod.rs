//! Command handlers
//!
//! Each handler resolves configuration, wires infrastructure adapters into
//! the use cases, and picks the event sink for the output mode.

mod deploy;
mod watch;

pub use deploy::cmd_deploy;
pub use watch::cmd_watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use deploy_agent::application::DeployUseCase;
use deploy_agent::config::{self, Config};
use deploy_agent::domain::entities::RepositoryRef;
use deploy_agent::domain::ports::{DeployEventSink, EnvBootstrap, NoopBootstrap};
use deploy_agent::domain::value_objects::Service;
use deploy_agent::error::DeployError;
use deploy_agent::infrastructure::{
    CommandRunner, ConsoleEventSink, DockerCliRuntime, GithubSourceHost, JsonEventSink,
    LocalEnvBootstrap, RuntimeProbe, SystemRunner,
};
use deploy_agent::ui::detect_capabilities;

use crate::cli::RepoArgs;

pub type AgentDeploy = DeployUseCase<GithubSourceHost, DockerCliRuntime, Box<dyn EnvBootstrap>>;

/// Resolved settings shared by every command
pub struct Context {
    pub base_dir: PathBuf,
    pub config: Config,
    pub json: bool,
}

impl Context {
    /// Load the config file, then environment overrides
    ///
    /// `.env.local` must already be loaded so its variables count as
    /// environment.
    pub fn load(base_dir: &Path, config_path: Option<&Path>, json: bool) -> Result<Self> {
        if !base_dir.is_dir() {
            anyhow::bail!("base directory not found: {}", base_dir.display());
        }
        let base_dir = base_dir
            .canonicalize()
            .with_context(|| format!("could not resolve {}", base_dir.display()))?;

        let (config, warnings) = config::load(&base_dir, config_path)?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        Ok(Self {
            base_dir,
            config,
            json,
        })
    }

    /// Repositories to deploy; CLI flags win over configuration
    pub fn repositories(&self, args: &RepoArgs) -> Result<Vec<RepositoryRef>, DeployError> {
        Service::ALL
            .iter()
            .map(|service| {
                let (flag, env, cli_url) = match service {
                    Service::Frontend => ("fe-repo", "FE_REPO_URL", args.fe_repo.as_deref()),
                    Service::Backend => ("be-repo", "BE_REPO_URL", args.be_repo.as_deref()),
                };
                let url = cli_url
                    .filter(|u| !u.trim().is_empty())
                    .or_else(|| self.config.repo_url(*service))
                    .ok_or(DeployError::MissingRepoUrl {
                        service: *service,
                        flag,
                        env,
                    })?;
                RepositoryRef::new(*service, url, &self.base_dir)
            })
            .collect()
    }

    fn runner(&self) -> Arc<dyn CommandRunner> {
        if self.json {
            Arc::new(SystemRunner::captured())
        } else {
            Arc::new(SystemRunner::inherited())
        }
    }

    /// Wire the deploy use case against GitHub, docker, and the local host
    pub fn deploy_use_case(&self, skip_bootstrap: bool) -> Result<AgentDeploy> {
        let token = self.config.token().ok_or(DeployError::MissingToken)?;
        let runner = self.runner();
        let probe = RuntimeProbe::system();

        let target = self
            .config
            .deployment_target(probe.compose_dir(&self.base_dir));
        tracing::debug!(compose_dir = %target.compose_dir.display(), "deployment target");

        let source_host = GithubSourceHost::new(runner.clone(), Some(token))?;
        let runtime = DockerCliRuntime::new(runner.clone(), target);
        let bootstrap: Box<dyn EnvBootstrap> = if skip_bootstrap {
            Box::new(NoopBootstrap::new("disabled with --skip-bootstrap"))
        } else {
            Box::new(LocalEnvBootstrap::new(
                runner,
                probe,
                self.config.deployment.backend_port,
            ))
        };

        Ok(DeployUseCase::new(source_host, runtime, bootstrap))
    }

    pub fn deploy_sink(&self) -> Arc<dyn DeployEventSink> {
        if self.json {
            Arc::new(JsonEventSink::stdout())
        } else {
            Arc::new(ConsoleEventSink::stdout(detect_capabilities()))
        }
    }
}
