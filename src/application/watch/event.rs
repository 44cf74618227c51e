//! Watch event types and options

use std::time::Duration;

use crate::domain::entities::RepositoryRef;
use crate::domain::ports::DeployStep;
use crate::domain::value_objects::{OverrideSet, Service};
use crate::error::ErrorKind;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Repositories to poll
    pub repositories: Vec<RepositoryRef>,
    /// Local files a sync must not overwrite
    pub overrides: OverrideSet,
    /// Time between the end of one tick and the start of the next
    pub interval: Duration,
    /// Run a single tick, then return
    pub once: bool,
}

impl WatchOptions {
    pub fn new(repositories: Vec<RepositoryRef>, interval: Duration) -> Self {
        Self {
            repositories,
            overrides: OverrideSet::default(),
            interval,
            once: false,
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideSet) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn services(&self) -> Vec<Service> {
        self.repositories.iter().map(|r| r.service).collect()
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted {
        services: Vec<Service>,
        interval_secs: u64,
        state_file: Option<String>,
    },
    /// A poll tick began
    PollStarted { tick: u64 },
    /// Remote head could not be read; state left as it was
    LookupFailed { service: Service, message: String },
    /// First observation recorded as deployed
    Baseline { service: Service, sha: String },
    /// Remote head differs from the deployed commit
    ChangeDetected {
        service: Service,
        deployed: String,
        observed: String,
    },
    /// Redeploy of stale services began
    RedeployStarted { services: Vec<Service> },
    /// Redeploy succeeded; services are synced
    RedeployCompleted { services: Vec<Service> },
    /// Redeploy failed; services stay stale until the next tick
    RedeployFailed {
        services: Vec<Service>,
        step: DeployStep,
        kind: ErrorKind,
        message: String,
    },
    /// Error occurred
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}
