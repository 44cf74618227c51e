//! Console Event Sink
//!
//! Human-readable deploy progress, one line per event.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink, DeployStep};
use crate::ui::{ColoredText, Icons, TerminalCapabilities};

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    icons: Icons,
}

impl ConsoleEventSink {
    pub fn stdout(caps: TerminalCapabilities) -> Self {
        Self::with_writer(io::stdout(), caps.supports_color, caps.supports_unicode)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, color: bool, unicode: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color,
            icons: Icons::new(unicode),
        }
    }

    fn render(&self, event: &DeployEvent) -> String {
        let icons = &self.icons;
        match event {
            DeployEvent::Started { services } => {
                let names: Vec<String> = services.iter().map(|s| s.to_string()).collect();
                ColoredText::info(format!("Deploying {}", names.join(", ")))
                    .bold()
                    .render(self.color)
            }
            DeployEvent::StepStarted { step } => format!(
                "{} {}",
                ColoredText::dim(format!("[{}/{}]", step.index(), DeployStep::ALL.len()))
                    .render(self.color),
                step.title()
            ),
            DeployEvent::RepositorySynced {
                service,
                created,
                written,
                unchanged,
                preserved,
            } => {
                let detail = if *created {
                    format!("cloned {} files", written)
                } else {
                    format!(
                        "{} updated, {} unchanged, {} preserved",
                        written, unchanged, preserved
                    )
                };
                format!(
                    "  {} {} ({})",
                    ColoredText::success(icons.success).render(self.color),
                    service,
                    detail
                )
            }
            DeployEvent::BootstrapSkipped { service, reason } => format!(
                "  {} {} skipped: {}",
                ColoredText::dim(icons.arrow).render(self.color),
                service,
                reason
            ),
            DeployEvent::ContainerRemoved { container, .. } => format!(
                "  {} removed {}",
                ColoredText::dim(icons.arrow).render(self.color),
                container
            ),
            DeployEvent::Warning { message } => format!(
                "  {} {}",
                ColoredText::warning(icons.warning).render(self.color),
                message
            ),
            DeployEvent::Failed { step, message, .. } => format!(
                "{} {} failed: {}",
                ColoredText::error(icons.error).render(self.color),
                step.title(),
                message
            ),
            DeployEvent::Completed { .. } => format!(
                "{} {}",
                ColoredText::success(icons.success).render(self.color),
                ColoredText::success("Deployment complete")
                    .bold()
                    .render(self.color)
            ),
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let line = self.render(&event);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Service;
    use crate::error::ErrorKind;

    fn plain() -> ConsoleEventSink {
        ConsoleEventSink::with_writer(io::sink(), false, false)
    }

    #[test]
    fn step_lines_are_numbered() {
        let line = plain().render(&DeployEvent::StepStarted {
            step: DeployStep::Build,
        });
        assert_eq!(line, "[4/7] Building images");
    }

    #[test]
    fn sync_line_summarizes_merge() {
        let line = plain().render(&DeployEvent::RepositorySynced {
            service: Service::Backend,
            created: false,
            written: 2,
            unchanged: 10,
            preserved: 1,
        });
        assert_eq!(
            line,
            "  [OK] backend (2 updated, 10 unchanged, 1 preserved)"
        );
    }

    #[test]
    fn failure_names_the_step() {
        let line = plain().render(&DeployEvent::Failed {
            step: DeployStep::Start,
            kind: ErrorKind::Runtime,
            message: "port in use".into(),
        });
        assert_eq!(line, "[FAIL] Starting services failed: port in use");
    }
}
