//! Common test utilities for CLI tests.
//!
//! `TestEnv` gives each test an isolated base directory and a command with
//! every variable the agent reads cleared, so the outer environment never
//! leaks into a run.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

pub const FE_URL: &str = "https://github.com/example-org/web-frontend";
pub const BE_URL: &str = "https://github.com/example-org/api-backend.git";

const AGENT_ENV: &[&str] = &[
    "GITHUB_TOKEN",
    "FE_REPO_URL",
    "BE_REPO_URL",
    "POLL_INTERVAL",
    "DOCKER_BUILD_PLATFORM",
    "PORT",
    "DEPLOY_AGENT_LOG",
    "GITHUB_ACTIONS",
];

pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.base().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Command with a clean agent environment, rooted at the temp base dir
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_deploy-agent"));
        for key in AGENT_ENV {
            cmd.env_remove(key);
        }
        cmd.env("NO_COLOR", "1")
            .current_dir(self.base())
            .arg("--base-dir")
            .arg(self.base());
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().unwrap()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Parse stdout as NDJSON
pub fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    stdout(output)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("invalid JSON line {l:?}: {e}")))
        .collect()
}
