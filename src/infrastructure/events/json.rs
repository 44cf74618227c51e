//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn to_json(event: DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started { services } => serde_json::json!({
            "event": "start",
            "command": "deploy",
            "services": services,
        }),

        DeployEvent::StepStarted { step } => serde_json::json!({
            "event": "step_start",
            "command": "deploy",
            "step": step,
            "index": step.index(),
        }),

        DeployEvent::RepositorySynced {
            service,
            created,
            written,
            unchanged,
            preserved,
        } => serde_json::json!({
            "event": "repository_synced",
            "command": "deploy",
            "service": service,
            "created": created,
            "written": written,
            "unchanged": unchanged,
            "preserved": preserved,
        }),

        DeployEvent::BootstrapSkipped { service, reason } => serde_json::json!({
            "event": "bootstrap_skipped",
            "command": "deploy",
            "service": service,
            "reason": reason,
        }),

        DeployEvent::ContainerRemoved { service, container } => serde_json::json!({
            "event": "container_removed",
            "command": "deploy",
            "service": service,
            "container": container,
        }),

        DeployEvent::Warning { message } => serde_json::json!({
            "event": "warning",
            "command": "deploy",
            "message": message,
        }),

        DeployEvent::Failed {
            step,
            kind,
            message,
        } => serde_json::json!({
            "event": "error",
            "command": "deploy",
            "step": step,
            "kind": kind,
            "message": message,
        }),

        DeployEvent::Completed { services } => serde_json::json!({
            "event": "complete",
            "command": "deploy",
            "status": "success",
            "services": services,
        }),
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(to_json(event));
    }
}
