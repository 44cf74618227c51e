//! Branch snapshots via shallow git clone
//!
//! The token travels in an `http.extraHeader` config value for this one
//! invocation, so it is never written to `.git/config` or the remote URL.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::value_objects::RepoSlug;
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::process::{CommandOutput, CommandRunner, CommandSpec};

/// stderr fragments git prints when credentials are rejected
const AUTH_FAILURE_MARKERS: [&str; 5] = [
    "authentication failed",
    "could not read username",
    "invalid username or password",
    "403",
    "401",
];

/// Upper bound for one clone
pub const CLONE_TIMEOUT: Duration = Duration::from_secs(600);

pub struct GitSnapshot {
    runner: Arc<dyn CommandRunner>,
}

impl GitSnapshot {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Clone the tip of `branch` into `dest` (must not exist) and drop `.git`
    pub fn fetch(&self, repo: &RepoSlug, branch: &str, token: &str, dest: &Path) -> DeployResult<()> {
        let credentials = STANDARD.encode(format!("x-access-token:{}", token));
        let cmd = CommandSpec::new("git")
            .arg("-c")
            .arg(format!("http.extraHeader=Authorization: Basic {}", credentials))
            .args(["clone", "--quiet", "--depth", "1", "--single-branch", "--branch"])
            .arg(branch)
            .arg(repo.clone_url())
            .arg(dest.to_string_lossy())
            .env("GIT_TERMINAL_PROMPT", "0")
            .timeout(CLONE_TIMEOUT)
            .secret(credentials)
            .secret(token);

        tracing::info!(repo = %repo, branch = %branch, "fetching snapshot");
        let out = self.runner.run(&cmd).map_err(|e| DeployError::Fetch {
            repo: repo.to_string(),
            message: format!("could not run git: {}", e),
        })?;

        if !out.success() {
            return Err(clone_error(repo, &out));
        }

        let git_dir = dest.join(".git");
        if git_dir.exists() {
            fs::remove_dir_all(&git_dir)?;
        }
        Ok(())
    }
}

fn clone_error(repo: &RepoSlug, out: &CommandOutput) -> DeployError {
    let stderr = out.stderr.to_lowercase();
    let message = format!("git clone failed with {}", out.describe_failure());
    if AUTH_FAILURE_MARKERS.iter().any(|m| stderr.contains(m)) {
        DeployError::Auth {
            repo: repo.to_string(),
            message,
        }
    } else {
        DeployError::Fetch {
            repo: repo.to_string(),
            message,
        }
    }
}
