//! Deploy Result
//!
//! Outcome types for the redeployment procedure.

use thiserror::Error;

use crate::domain::ports::{BootstrapOutcome, ContainerRemoval, DeployStep, SyncReport};
use crate::domain::value_objects::Service;
use crate::error::DeployError;

/// Record of a completed deploy
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    pub services: Vec<Service>,
    pub synced: Vec<(Service, SyncReport)>,
    pub bootstrapped: Vec<(Service, BootstrapOutcome)>,
    pub removed: Vec<(Service, ContainerRemoval)>,
    /// Non-fatal problems (e.g. image cleanup)
    pub warnings: Vec<String>,
}

impl DeployReport {
    pub fn new(services: Vec<Service>) -> Self {
        Self {
            services,
            ..Self::default()
        }
    }

    pub fn files_written(&self) -> usize {
        self.synced.iter().map(|(_, r)| r.written.len()).sum()
    }
}

/// The step that aborted a deploy, with its cause
#[derive(Debug, Error)]
#[error("{} failed: {}", .step.title(), .source)]
pub struct StepFailure {
    pub step: DeployStep,
    #[source]
    pub source: DeployError,
}

impl StepFailure {
    pub fn new(step: DeployStep, source: DeployError) -> Self {
        Self { step, source }
    }
}
