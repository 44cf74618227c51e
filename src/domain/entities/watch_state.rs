//! Watch state entity
//!
//! The watcher's record of what is deployed versus what the remote reports.
//! Passed into and returned from every poll; nothing else mutates it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{CommitSha, Service};

/// Per-repository deployment state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RepoState {
    /// Nothing recorded and nothing observed yet
    #[default]
    Unknown,
    /// Deployed code matches the remote head
    Synced { sha: CommitSha },
    /// Remote head moved; redeploy pending or previously failed
    Stale {
        deployed: CommitSha,
        observed: CommitSha,
    },
}

impl RepoState {
    pub fn is_stale(&self) -> bool {
        matches!(self, RepoState::Stale { .. })
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, RepoState::Synced { .. })
    }
}

/// A tracked repository's state plus when it was last deployed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackedRepo {
    pub state: RepoState,
    pub deployed_at: Option<DateTime<Utc>>,
}

/// State of every tracked repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchState {
    pub version: u32,
    repos: BTreeMap<Service, TrackedRepo>,
}

impl WatchState {
    pub fn new() -> Self {
        Self {
            version: 1,
            repos: Service::ALL
                .iter()
                .map(|s| (*s, TrackedRepo::default()))
                .collect(),
        }
    }

    pub fn get(&self, service: Service) -> &TrackedRepo {
        // Every service is inserted by `new`, and entries are never removed.
        static UNKNOWN: TrackedRepo = TrackedRepo {
            state: RepoState::Unknown,
            deployed_at: None,
        };
        self.repos.get(&service).unwrap_or(&UNKNOWN)
    }

    pub fn state(&self, service: Service) -> &RepoState {
        &self.get(service).state
    }

    /// Return a copy with `service` replaced
    pub fn with(mut self, service: Service, tracked: TrackedRepo) -> Self {
        self.repos.insert(service, tracked);
        self
    }

    /// Services whose state is `Stale`
    pub fn stale_services(&self) -> Vec<Service> {
        self.repos
            .iter()
            .filter(|(_, t)| t.state.is_stale())
            .map(|(s, _)| *s)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Service, &TrackedRepo)> {
        self.repos.iter().map(|(s, t)| (*s, t))
    }
}

impl Default for WatchState {
    fn default() -> Self {
        Self::new()
    }
}
