//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables console progress, NDJSON event streams, and test assertions.

use crate::domain::value_objects::Service;
use crate::error::ErrorKind;

/// A step of the redeployment procedure, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    Preflight,
    Sync,
    Bootstrap,
    Build,
    Teardown,
    Start,
    Cleanup,
}

impl DeployStep {
    pub const ALL: [DeployStep; 7] = [
        DeployStep::Preflight,
        DeployStep::Sync,
        DeployStep::Bootstrap,
        DeployStep::Build,
        DeployStep::Teardown,
        DeployStep::Start,
        DeployStep::Cleanup,
    ];

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0) + 1
    }

    pub fn title(&self) -> &'static str {
        match self {
            DeployStep::Preflight => "Checking container runtime",
            DeployStep::Sync => "Syncing repositories",
            DeployStep::Bootstrap => "Bootstrapping local environments",
            DeployStep::Build => "Building images",
            DeployStep::Teardown => "Removing old containers",
            DeployStep::Start => "Starting services",
            DeployStep::Cleanup => "Cleaning up unused images",
        }
    }
}

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Deploy started
    Started { services: Vec<Service> },

    /// A step began
    StepStarted { step: DeployStep },

    /// A repository finished syncing
    RepositorySynced {
        service: Service,
        created: bool,
        written: usize,
        unchanged: usize,
        preserved: usize,
    },

    /// Bootstrap was skipped for a service
    BootstrapSkipped { service: Service, reason: String },

    /// A container was removed
    ContainerRemoved { service: Service, container: String },

    /// Non-fatal problem
    Warning { message: String },

    /// A step failed; remaining steps are aborted
    Failed {
        step: DeployStep,
        kind: ErrorKind,
        message: String,
    },

    /// Deploy completed
    Completed { services: Vec<Service> },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: Progress lines in the terminal
/// - JsonEventSink: NDJSON event stream
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_numbered_in_order() {
        assert_eq!(DeployStep::Preflight.index(), 1);
        assert_eq!(DeployStep::Sync.index(), 2);
        assert_eq!(DeployStep::Build.index(), 4);
        assert_eq!(DeployStep::Cleanup.index(), DeployStep::ALL.len());
    }

    #[test]
    fn noop_sink_accepts_events() {
        let sink = NoopEventSink;
        sink.on_event(DeployEvent::Completed { services: vec![] });
    }
}
