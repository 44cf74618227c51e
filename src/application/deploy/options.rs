//! Deploy Options

use crate::domain::entities::RepositoryRef;
use crate::domain::value_objects::{OverrideSet, Service};

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Repositories to redeploy, in deploy order
    pub repositories: Vec<RepositoryRef>,
    /// Local files a sync must not overwrite
    pub overrides: OverrideSet,
}

impl DeployOptions {
    pub fn new(repositories: Vec<RepositoryRef>) -> Self {
        Self {
            repositories,
            overrides: OverrideSet::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideSet) -> Self {
        self.overrides = overrides;
        self
    }

    /// Keep only the repositories for `services`
    pub fn only(mut self, services: &[Service]) -> Self {
        self.repositories.retain(|r| services.contains(&r.service));
        self
    }

    pub fn services(&self) -> Vec<Service> {
        self.repositories.iter().map(|r| r.service).collect()
    }
}
