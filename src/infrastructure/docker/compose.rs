//! Compose Flavor Detection
//!
//! Compose v2 ships as a docker CLI plugin (`docker compose`), v1 as a
//! standalone binary (`docker-compose`). They also spell the project flag
//! differently.

use crate::error::{DeployError, DeployResult};
use crate::infrastructure::process::{CommandRunner, CommandSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeFlavor {
    /// `docker compose -p <project>`
    V2,
    /// `docker-compose --project-name <project>`
    V1,
}

impl ComposeFlavor {
    /// Detect the best available compose implementation (v2 preferred)
    pub fn detect(runner: &dyn CommandRunner) -> DeployResult<Self> {
        if runner.is_available("docker", &["compose", "version"]) {
            return Ok(ComposeFlavor::V2);
        }
        if runner.is_available("docker-compose", &["version"]) {
            return Ok(ComposeFlavor::V1);
        }
        Err(DeployError::ComposeNotFound)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComposeFlavor::V2 => "docker compose",
            ComposeFlavor::V1 => "docker-compose",
        }
    }

    fn project_flag(&self) -> &'static str {
        match self {
            ComposeFlavor::V2 => "-p",
            ComposeFlavor::V1 => "--project-name",
        }
    }

    /// Base command with project name and compose file applied
    pub fn command(&self, project: &str, compose_file: &str) -> CommandSpec {
        let base = match self {
            ComposeFlavor::V2 => CommandSpec::new("docker").arg("compose"),
            ComposeFlavor::V1 => CommandSpec::new("docker-compose"),
        };
        base.args(["-f", compose_file])
            .args([self.project_flag(), project])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::process::testing::ScriptedRunner;
    use crate::infrastructure::process::CommandOutput;

    #[test]
    fn prefers_v2_plugin() {
        let runner = ScriptedRunner::new();
        assert_eq!(ComposeFlavor::detect(&runner).unwrap(), ComposeFlavor::V2);
    }

    #[test]
    fn falls_back_to_v1_binary() {
        let runner = ScriptedRunner::new().on(
            "docker",
            &["compose"],
            CommandOutput::failed(1, "docker: 'compose' is not a docker command."),
        );
        assert_eq!(ComposeFlavor::detect(&runner).unwrap(), ComposeFlavor::V1);
    }

    #[test]
    fn reports_missing_compose() {
        let runner = ScriptedRunner::new()
            .missing("docker")
            .missing("docker-compose");
        assert!(matches!(
            ComposeFlavor::detect(&runner),
            Err(DeployError::ComposeNotFound)
        ));
    }

    #[test]
    fn project_flag_differs_by_flavor() {
        let v2 = ComposeFlavor::V2.command("jalindeploy", "docker-compose.yml");
        assert_eq!(
            v2.to_string(),
            "docker compose -f docker-compose.yml -p jalindeploy"
        );
        let v1 = ComposeFlavor::V1.command("jalindeploy", "docker-compose.yml");
        assert_eq!(
            v1.to_string(),
            "docker-compose -f docker-compose.yml --project-name jalindeploy"
        );
    }
}
