//! Environment bootstrap port
//!
//! Prepares local (non-containerized) environments for a checkout.

use crate::domain::entities::RepositoryRef;
use crate::error::DeployResult;

/// Result of bootstrapping one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Nothing done; the reason is reported to the user
    Skipped { reason: String },
    /// Environment ensured; lists the actions that ran
    Prepared { actions: Vec<String> },
}

pub trait EnvBootstrap {
    /// Ensure the local environment for `repo` exists (idempotent)
    fn bootstrap(&self, repo: &RepositoryRef) -> DeployResult<BootstrapOutcome>;
}

/// Bootstrap that never does anything (containerized deploys, `--skip-bootstrap`)
pub struct NoopBootstrap {
    reason: String,
}

impl NoopBootstrap {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl EnvBootstrap for NoopBootstrap {
    fn bootstrap(&self, _repo: &RepositoryRef) -> DeployResult<BootstrapOutcome> {
        Ok(BootstrapOutcome::Skipped {
            reason: self.reason.clone(),
        })
    }
}

impl<T: EnvBootstrap + ?Sized> EnvBootstrap for Box<T> {
    fn bootstrap(&self, repo: &RepositoryRef) -> DeployResult<BootstrapOutcome> {
        (**self).bootstrap(repo)
    }
}
