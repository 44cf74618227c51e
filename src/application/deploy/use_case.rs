//! Deploy Use Case
//!
//! Runs the redeployment steps in order:
//! 1. Preflight the container runtime
//! 2. Sync repositories
//! 3. Bootstrap local environments
//! 4. Build images
//! 5. Remove old containers
//! 6. Start services
//! 7. Clean up unused images
//!
//! The first failing step aborts the rest. Images are built before any
//! container is touched, so a failed build leaves the old services running.
//! Cleanup failures are reported as warnings only.

use std::sync::Arc;

use crate::domain::ports::{
    BootstrapOutcome, ContainerRemoval, ContainerRuntime, DeployEvent, DeployEventSink,
    DeployStep, EnvBootstrap, NoopEventSink, SourceHost,
};
use crate::error::DeployError;

use super::options::DeployOptions;
use super::result::{DeployReport, StepFailure};

/// Deploy use case, parameterized by its ports
pub struct DeployUseCase<SH, CR, EB>
where
    SH: SourceHost,
    CR: ContainerRuntime,
    EB: EnvBootstrap,
{
    source_host: SH,
    runtime: CR,
    bootstrap: EB,
}

impl<SH, CR, EB> DeployUseCase<SH, CR, EB>
where
    SH: SourceHost,
    CR: ContainerRuntime,
    EB: EnvBootstrap,
{
    pub fn new(source_host: SH, runtime: CR, bootstrap: EB) -> Self {
        Self {
            source_host,
            runtime,
            bootstrap,
        }
    }

    pub fn source_host(&self) -> &SH {
        &self.source_host
    }

    /// Execute without event reporting
    pub fn execute(&self, options: &DeployOptions) -> Result<DeployReport, StepFailure> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    /// Execute, reporting progress to `events`
    pub fn execute_with_events(
        &self,
        options: &DeployOptions,
        events: Arc<dyn DeployEventSink>,
    ) -> Result<DeployReport, StepFailure> {
        let services = options.services();
        events.on_event(DeployEvent::Started {
            services: services.clone(),
        });

        let mut report = DeployReport::new(services.clone());
        match self.run_steps(options, &mut report, events.as_ref()) {
            Ok(()) => {
                events.on_event(DeployEvent::Completed { services });
                Ok(report)
            }
            Err(failure) => {
                tracing::error!(step = ?failure.step, "{}", failure);
                events.on_event(DeployEvent::Failed {
                    step: failure.step,
                    kind: failure.source.kind(),
                    message: failure.source.to_string(),
                });
                Err(failure)
            }
        }
    }

    fn run_steps(
        &self,
        options: &DeployOptions,
        report: &mut DeployReport,
        events: &dyn DeployEventSink,
    ) -> Result<(), StepFailure> {
        let services = options.services();
        if services.is_empty() {
            return Ok(());
        }
        let step = |s: DeployStep| {
            tracing::info!("{}", s.title());
            events.on_event(DeployEvent::StepStarted { step: s });
        };
        let fail = |s: DeployStep| move |e: DeployError| StepFailure::new(s, e);

        step(DeployStep::Preflight);
        self.runtime.preflight().map_err(fail(DeployStep::Preflight))?;

        step(DeployStep::Sync);
        for repo in &options.repositories {
            let sync = self
                .source_host
                .sync_repository(repo, &options.overrides)
                .map_err(fail(DeployStep::Sync))?;
            events.on_event(DeployEvent::RepositorySynced {
                service: repo.service,
                created: sync.created,
                written: sync.written.len(),
                unchanged: sync.unchanged.len(),
                preserved: sync.preserved.len(),
            });
            report.synced.push((repo.service, sync));
        }

        step(DeployStep::Bootstrap);
        for repo in &options.repositories {
            let outcome = self
                .bootstrap
                .bootstrap(repo)
                .map_err(fail(DeployStep::Bootstrap))?;
            match &outcome {
                BootstrapOutcome::Skipped { reason } => {
                    events.on_event(DeployEvent::BootstrapSkipped {
                        service: repo.service,
                        reason: reason.clone(),
                    })
                }
                BootstrapOutcome::Prepared { actions } => {
                    tracing::info!(service = %repo.service, actions = actions.len(), "environment ready")
                }
            }
            report.bootstrapped.push((repo.service, outcome));
        }

        step(DeployStep::Build);
        self.runtime
            .build_images(&services)
            .map_err(fail(DeployStep::Build))?;

        step(DeployStep::Teardown);
        for service in &services {
            let removal = self
                .runtime
                .stop_container(*service)
                .map_err(fail(DeployStep::Teardown))?;
            if removal == ContainerRemoval::Removed {
                events.on_event(DeployEvent::ContainerRemoved {
                    service: *service,
                    container: self.runtime.container_name(*service),
                });
            }
            report.removed.push((*service, removal));
        }

        step(DeployStep::Start);
        self.runtime
            .start_services(&services)
            .map_err(fail(DeployStep::Start))?;

        step(DeployStep::Cleanup);
        if let Err(e) = self.runtime.remove_unused_images(&services) {
            let message = format!("image cleanup failed: {}", e);
            tracing::warn!("{}", message);
            events.on_event(DeployEvent::Warning {
                message: message.clone(),
            });
            report.warnings.push(message);
        }

        Ok(())
    }
}
