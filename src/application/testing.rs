//! In-memory fakes for use case tests

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::domain::entities::RepositoryRef;
use crate::domain::ports::{
    BootstrapOutcome, ContainerRemoval, ContainerRuntime, DeployEvent, DeployEventSink,
    EnvBootstrap, SourceHost, SyncReport,
};
use crate::domain::value_objects::{CommitSha, OverrideSet, RepoSlug, Service};
use crate::error::{DeployError, DeployResult};

pub fn repo(service: Service) -> RepositoryRef {
    let url = match service {
        Service::Frontend => "https://github.com/org/fe",
        Service::Backend => "https://github.com/org/be",
    };
    RepositoryRef::new(service, url, Path::new("/srv/deploy")).unwrap()
}

pub fn both_repos() -> Vec<RepositoryRef> {
    Service::ALL.iter().map(|s| repo(*s)).collect()
}

/// Shared log of every port call, in order
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

/// Source host answering commit lookups from per-service scripts
#[derive(Default)]
pub struct FakeSourceHost {
    pub log: CallLog,
    /// Successive head commits per repository name; the last one repeats
    heads: Mutex<BTreeMap<String, VecDeque<Option<&'static str>>>>,
    pub fail_sync: Mutex<Option<DeployError>>,
}

impl FakeSourceHost {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Script head commits for `service`; `None` simulates a failed lookup
    pub fn heads(self, service: Service, shas: &[Option<&'static str>]) -> Self {
        let name = repo(service).slug.name().to_string();
        self.heads
            .lock()
            .unwrap()
            .insert(name, shas.iter().copied().collect());
        self
    }
}

impl SourceHost for FakeSourceHost {
    fn latest_commit(&self, repo: &RepoSlug) -> DeployResult<CommitSha> {
        self.log.push(format!("latest_commit {}", repo.name()));
        let mut heads = self.heads.lock().unwrap();
        let queue = heads.entry(repo.name().to_string()).or_default();
        let next = if queue.len() > 1 {
            queue.pop_front().flatten()
        } else {
            queue.front().copied().flatten()
        };
        next.map(CommitSha::from).ok_or_else(|| DeployError::Fetch {
            repo: repo.to_string(),
            message: "connection reset".into(),
        })
    }

    fn sync_repository(
        &self,
        repo: &RepositoryRef,
        _overrides: &OverrideSet,
    ) -> DeployResult<SyncReport> {
        self.log.push(format!("sync {}", repo.service));
        if let Some(err) = self.fail_sync.lock().unwrap().take() {
            return Err(err);
        }
        Ok(SyncReport {
            branch: "main".into(),
            ..SyncReport::default()
        })
    }
}

/// Runtime recording calls; individual operations can be made to fail
#[derive(Default)]
pub struct FakeRuntime {
    pub log: CallLog,
    pub fail_build: Mutex<u32>,
    pub fail_start: bool,
    pub fail_cleanup: bool,
}

impl FakeRuntime {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Fail the next `times` builds
    pub fn failing_builds(self, times: u32) -> Self {
        *self.fail_build.lock().unwrap() = times;
        self
    }
}

fn names(services: &[Service]) -> String {
    services
        .iter()
        .map(|s| s.compose_name())
        .collect::<Vec<_>>()
        .join(",")
}

impl ContainerRuntime for FakeRuntime {
    fn build_images(&self, services: &[Service]) -> DeployResult<()> {
        self.log.push(format!("build {}", names(services)));
        let mut remaining = self.fail_build.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(DeployError::Build {
                message: "exit code 1".into(),
            });
        }
        Ok(())
    }

    fn stop_container(&self, service: Service) -> DeployResult<ContainerRemoval> {
        self.log.push(format!("stop {}", service));
        Ok(ContainerRemoval::Removed)
    }

    fn start_services(&self, services: &[Service]) -> DeployResult<()> {
        self.log.push(format!("start {}", names(services)));
        if self.fail_start {
            return Err(DeployError::Runtime {
                message: "port is already allocated".into(),
            });
        }
        Ok(())
    }

    fn remove_unused_images(&self, services: &[Service]) -> DeployResult<()> {
        self.log.push(format!("cleanup {}", names(services)));
        if self.fail_cleanup {
            return Err(DeployError::Runtime {
                message: "daemon busy".into(),
            });
        }
        Ok(())
    }
}

pub struct FakeBootstrap {
    pub log: CallLog,
}

impl EnvBootstrap for FakeBootstrap {
    fn bootstrap(&self, repo: &RepositoryRef) -> DeployResult<BootstrapOutcome> {
        self.log.push(format!("bootstrap {}", repo.service));
        Ok(BootstrapOutcome::Prepared { actions: vec![] })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DeployEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}
