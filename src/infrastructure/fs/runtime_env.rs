//! Containerized-runtime detection
//!
//! The agent can run on a host or inside its own container with the
//! project directory mounted. Both bootstrap and compose paths depend on
//! which one applies.

use std::path::{Path, PathBuf};

/// Where the project is mounted when the agent runs in a container
pub const CONTAINER_PROJECT_DIR: &str = "/app/project";

/// Probe locations, overridable for tests
#[derive(Debug, Clone)]
pub struct RuntimeProbe {
    dockerenv: PathBuf,
    cgroup: PathBuf,
}

impl RuntimeProbe {
    pub fn system() -> Self {
        Self {
            dockerenv: PathBuf::from("/.dockerenv"),
            cgroup: PathBuf::from("/proc/self/cgroup"),
        }
    }

    pub fn with_paths(dockerenv: impl Into<PathBuf>, cgroup: impl Into<PathBuf>) -> Self {
        Self {
            dockerenv: dockerenv.into(),
            cgroup: cgroup.into(),
        }
    }

    /// `/.dockerenv` exists, or the cgroup file mentions docker
    pub fn is_containerized(&self) -> bool {
        if self.dockerenv.exists() {
            return true;
        }
        std::fs::read_to_string(&self.cgroup)
            .map(|content| content.contains("docker"))
            .unwrap_or(false)
    }

    /// Directory compose commands should run in
    pub fn compose_dir(&self, base_dir: &Path) -> PathBuf {
        let mounted = Path::new(CONTAINER_PROJECT_DIR);
        if self.is_containerized() && mounted.is_dir() {
            mounted.to_path_buf()
        } else {
            base_dir.to_path_buf()
        }
    }
}

impl Default for RuntimeProbe {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dockerenv_marks_containerized() {
        let dir = tempdir().unwrap();
        let marker = dir.path().join(".dockerenv");
        std::fs::write(&marker, "").unwrap();
        let probe = RuntimeProbe::with_paths(&marker, dir.path().join("cgroup"));
        assert!(probe.is_containerized());
    }

    #[test]
    fn cgroup_mentioning_docker_marks_containerized() {
        let dir = tempdir().unwrap();
        let cgroup = dir.path().join("cgroup");
        std::fs::write(&cgroup, "12:pids:/docker/abc123\n").unwrap();
        let probe = RuntimeProbe::with_paths(dir.path().join("missing"), &cgroup);
        assert!(probe.is_containerized());
    }

    #[test]
    fn plain_host_is_not_containerized() {
        let dir = tempdir().unwrap();
        let cgroup = dir.path().join("cgroup");
        std::fs::write(&cgroup, "0::/user.slice/session-2.scope\n").unwrap();
        let probe = RuntimeProbe::with_paths(dir.path().join("missing"), &cgroup);
        assert!(!probe.is_containerized());
        assert_eq!(probe.compose_dir(dir.path()), dir.path());
    }
}
