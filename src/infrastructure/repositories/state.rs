//! TOML State Repository
//!
//! Persists the watcher's deployed commits at `.deploy-agent/state.toml`
//! so a restarted watcher neither redeploys unchanged code nor forgets a
//! pending redeploy.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{RepoState, TrackedRepo, WatchState};
use crate::domain::ports::StateRepository;
use crate::domain::value_objects::{CommitSha, Service};
use crate::error::{DeployError, DeployResult};

pub const STATE_DIR: &str = ".deploy-agent";
pub const STATE_FILE: &str = "state.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TomlStatus {
    Synced,
    Stale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlRepoEntry {
    status: TomlStatus,
    sha: CommitSha,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observed: Option<CommitSha>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deployed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlState {
    version: u32,
    #[serde(default)]
    repos: BTreeMap<String, TomlRepoEntry>,
}

pub struct TomlStateRepository {
    path: PathBuf,
}

impl TomlStateRepository {
    /// State file under `base_dir/.deploy-agent/`
    pub fn in_dir(base_dir: &Path) -> Self {
        Self::with_path(base_dir.join(STATE_DIR).join(STATE_FILE))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn error(&self, message: impl ToString) -> DeployError {
        DeployError::State {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn save_to_disk(&self, state: &WatchState) -> DeployResult<()> {
        let content = toml::to_string_pretty(&to_toml(state)).map_err(|e| self.error(e))?;

        // Write beside the target, then rename, so a crash never truncates it
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.error(e))?;
        std::io::Write::write_all(&mut tmp, content.as_bytes()).map_err(|e| self.error(e))?;
        tmp.persist(&self.path).map_err(|e| self.error(e.error))?;
        Ok(())
    }
}

impl StateRepository for TomlStateRepository {
    fn load(&self) -> DeployResult<WatchState> {
        if !self.path.exists() {
            return Ok(WatchState::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        let toml_state: TomlState = toml::from_str(&content).map_err(|e| self.error(e))?;
        Ok(from_toml(toml_state))
    }

    fn save(&self, state: &WatchState) -> DeployResult<()> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }

        let lock_file = fs::File::create(&lock_path).map_err(|e| self.error(e))?;
        lock_file.lock_exclusive().map_err(|e| self.error(e))?;

        let result = self.save_to_disk(state);

        let _ = lock_file.unlock();
        result
    }

    fn location(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

fn to_toml(state: &WatchState) -> TomlState {
    let repos = state
        .iter()
        .filter_map(|(service, tracked)| {
            let entry = match &tracked.state {
                RepoState::Unknown => return None,
                RepoState::Synced { sha } => TomlRepoEntry {
                    status: TomlStatus::Synced,
                    sha: sha.clone(),
                    observed: None,
                    deployed_at: tracked.deployed_at,
                },
                RepoState::Stale { deployed, observed } => TomlRepoEntry {
                    status: TomlStatus::Stale,
                    sha: deployed.clone(),
                    observed: Some(observed.clone()),
                    deployed_at: tracked.deployed_at,
                },
            };
            Some((service.compose_name().to_string(), entry))
        })
        .collect();

    TomlState {
        version: state.version,
        repos,
    }
}

fn from_toml(toml_state: TomlState) -> WatchState {
    let mut state = WatchState::new();
    state.version = toml_state.version;
    for (name, entry) in toml_state.repos {
        let Some(service) = Service::ALL.into_iter().find(|s| s.compose_name() == name) else {
            tracing::warn!(service = %name, "ignoring unknown service in state file");
            continue;
        };
        let repo_state = match (entry.status, entry.observed) {
            (TomlStatus::Stale, Some(observed)) => RepoState::Stale {
                deployed: entry.sha,
                observed,
            },
            _ => RepoState::Synced { sha: entry.sha },
        };
        state = state.with(
            service,
            TrackedRepo {
                state: repo_state,
                deployed_at: entry.deployed_at,
            },
        );
    }
    state
}
