//! Change detection service
//!
//! Pure state transitions for the watcher. Given the current `WatchState`
//! and what a poll observed, decide which repositories are `STALE`.
//! Recording a successful redeploy is the only way back to `SYNCED`.

use chrono::{DateTime, Utc};

use crate::domain::entities::{RepoState, TrackedRepo, WatchState};
use crate::domain::value_objects::{CommitSha, Service};

/// Remote head reported for one repository on a poll
///
/// `sha` is `None` when the lookup failed; the repository's state is then
/// left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub service: Service,
    pub sha: Option<CommitSha>,
}

impl Observation {
    pub fn new(service: Service, sha: Option<CommitSha>) -> Self {
        Self { service, sha }
    }
}

/// A state change produced by `ChangeDetector::observe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// First observation, recorded as the deployed baseline
    Baseline { service: Service, sha: CommitSha },
    /// Remote head moved away from the deployed commit, or moved again
    /// while a redeploy is still pending
    Changed {
        service: Service,
        deployed: CommitSha,
        observed: CommitSha,
    },
}

pub struct ChangeDetector;

impl ChangeDetector {
    /// Apply one poll's observations
    pub fn observe(state: WatchState, observations: &[Observation]) -> (WatchState, Vec<Transition>) {
        let mut state = state;
        let mut transitions = Vec::new();

        for obs in observations {
            let Some(observed) = obs.sha.clone() else {
                continue;
            };
            let tracked = state.get(obs.service).clone();

            let next = match tracked.state {
                RepoState::Unknown => {
                    transitions.push(Transition::Baseline {
                        service: obs.service,
                        sha: observed.clone(),
                    });
                    RepoState::Synced { sha: observed }
                }
                RepoState::Synced { sha } if sha == observed => RepoState::Synced { sha },
                RepoState::Synced { sha } => {
                    transitions.push(Transition::Changed {
                        service: obs.service,
                        deployed: sha.clone(),
                        observed: observed.clone(),
                    });
                    RepoState::Stale {
                        deployed: sha,
                        observed,
                    }
                }
                // A failed attempt may already have torn the old containers
                // down, so even a head back at `deployed` needs a redeploy.
                RepoState::Stale {
                    deployed,
                    observed: previous,
                } => {
                    if previous != observed {
                        transitions.push(Transition::Changed {
                            service: obs.service,
                            deployed: deployed.clone(),
                            observed: observed.clone(),
                        });
                    }
                    RepoState::Stale { deployed, observed }
                }
            };

            state = state.with(
                obs.service,
                TrackedRepo {
                    state: next,
                    deployed_at: tracked.deployed_at,
                },
            );
        }

        (state, transitions)
    }

    /// Record that `services` were redeployed at their observed commits
    pub fn mark_deployed(state: WatchState, services: &[Service], now: DateTime<Utc>) -> WatchState {
        let mut state = state;
        for service in services {
            if let RepoState::Stale { observed, .. } = &state.get(*service).state {
                let sha = observed.clone();
                state = state.with(
                    *service,
                    TrackedRepo {
                        state: RepoState::Synced { sha },
                        deployed_at: Some(now),
                    },
                );
            }
        }
        state
    }
}
