//! Watch Use Case implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::application::deploy::{DeployOptions, DeployUseCase};
use crate::domain::entities::WatchState;
use crate::domain::ports::{
    ContainerRuntime, DeployEventSink, EnvBootstrap, NoopEventSink, SourceHost, StateRepository,
};
use crate::domain::services::{ChangeDetector, Observation, Transition};
use crate::domain::value_objects::Service;
use crate::error::DeployResult;

use super::event::{WatchEvent, WatchOptions};

/// Granularity of the cancellation check while sleeping between ticks
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing stale, nothing deployed
    Idle,
    Redeployed { services: Vec<Service> },
    RedeployFailed { services: Vec<Service> },
}

/// Watch Use Case
///
/// Orchestrates polling with auto-redeploy.
/// This is the main entry point for the `deploy-agent watch` command.
pub struct WatchUseCase<SH, CR, EB, SR>
where
    SH: SourceHost,
    CR: ContainerRuntime,
    EB: EnvBootstrap,
    SR: StateRepository,
{
    deploy: DeployUseCase<SH, CR, EB>,
    state_repo: SR,
    options: WatchOptions,
    deploy_events: Arc<dyn DeployEventSink>,
}

impl<SH, CR, EB, SR> WatchUseCase<SH, CR, EB, SR>
where
    SH: SourceHost,
    CR: ContainerRuntime,
    EB: EnvBootstrap,
    SR: StateRepository,
{
    pub fn new(deploy: DeployUseCase<SH, CR, EB>, state_repo: SR, options: WatchOptions) -> Self {
        Self {
            deploy,
            state_repo,
            options,
            deploy_events: Arc::new(NoopEventSink),
        }
    }

    /// Forward step-level progress of each redeploy to `sink`
    pub fn with_deploy_events(mut self, sink: Arc<dyn DeployEventSink>) -> Self {
        self.deploy_events = sink;
        self
    }

    pub fn state_repository(&self) -> &SR {
        &self.state_repo
    }

    /// Start watching (blocking)
    ///
    /// Loads saved state, then polls until `running` is cleared (or after a
    /// single tick with `once`). Only a state load failure is returned as an
    /// error; per-tick failures are reported as events.
    pub fn start<F>(&self, running: Arc<AtomicBool>, on_event: F) -> DeployResult<WatchState>
    where
        F: Fn(WatchEvent),
    {
        let mut state = self.state_repo.load()?;

        on_event(WatchEvent::WatchStarted {
            services: self.options.services(),
            interval_secs: self.options.interval.as_secs(),
            state_file: self.state_repo.location(),
        });

        let mut tick = 0u64;
        while running.load(Ordering::SeqCst) {
            tick += 1;
            on_event(WatchEvent::PollStarted { tick });
            tracing::debug!(tick, "poll tick");

            let (next, _) = self.poll_and_reconcile(state, &on_event);
            state = next;

            if self.options.once {
                break;
            }
            sleep_while_running(self.options.interval, &running);
        }

        on_event(WatchEvent::Shutdown);
        Ok(state)
    }

    /// One poll: observe remote heads, update state, redeploy stale services
    ///
    /// Returns the next state. A service only becomes synced at a new
    /// commit after its redeploy succeeded.
    pub fn poll_and_reconcile<F>(&self, state: WatchState, on_event: &F) -> (WatchState, TickOutcome)
    where
        F: Fn(WatchEvent),
    {
        let before = state.clone();

        let observations = self.observe(on_event);
        let (mut state, transitions) = ChangeDetector::observe(state, &observations);
        for transition in transitions {
            on_event(transition_event(transition));
        }

        let stale = state.stale_services();
        let outcome = if stale.is_empty() {
            TickOutcome::Idle
        } else {
            let (next, outcome) = self.redeploy(state, stale, on_event);
            state = next;
            outcome
        };

        if state != before {
            if let Err(e) = self.state_repo.save(&state) {
                tracing::warn!(error = %e, "could not save watch state");
                on_event(WatchEvent::Error {
                    message: e.to_string(),
                });
            }
        }

        (state, outcome)
    }

    fn observe<F>(&self, on_event: &F) -> Vec<Observation>
    where
        F: Fn(WatchEvent),
    {
        self.options
            .repositories
            .iter()
            .map(|repo| {
                let sha = match self.deploy.source_host().latest_commit(&repo.slug) {
                    Ok(sha) => Some(sha),
                    Err(e) => {
                        tracing::warn!(service = %repo.service, error = %e, "commit lookup failed");
                        on_event(WatchEvent::LookupFailed {
                            service: repo.service,
                            message: e.to_string(),
                        });
                        None
                    }
                };
                Observation::new(repo.service, sha)
            })
            .collect()
    }

    fn redeploy<F>(
        &self,
        state: WatchState,
        services: Vec<Service>,
        on_event: &F,
    ) -> (WatchState, TickOutcome)
    where
        F: Fn(WatchEvent),
    {
        on_event(WatchEvent::RedeployStarted {
            services: services.clone(),
        });

        let options = DeployOptions::new(self.options.repositories.clone())
            .with_overrides(self.options.overrides.clone())
            .only(&services);

        match self
            .deploy
            .execute_with_events(&options, self.deploy_events.clone())
        {
            Ok(_) => {
                let state = ChangeDetector::mark_deployed(state, &services, Utc::now());
                tracing::info!(?services, "redeploy completed");
                on_event(WatchEvent::RedeployCompleted {
                    services: services.clone(),
                });
                (state, TickOutcome::Redeployed { services })
            }
            Err(failure) => {
                on_event(WatchEvent::RedeployFailed {
                    services: services.clone(),
                    step: failure.step,
                    kind: failure.source.kind(),
                    message: failure.source.to_string(),
                });
                (state, TickOutcome::RedeployFailed { services })
            }
        }
    }
}

fn transition_event(transition: Transition) -> WatchEvent {
    match transition {
        Transition::Baseline { service, sha } => WatchEvent::Baseline {
            service,
            sha: sha.to_string(),
        },
        Transition::Changed {
            service,
            deployed,
            observed,
        } => WatchEvent::ChangeDetected {
            service,
            deployed: deployed.to_string(),
            observed: observed.to_string(),
        },
    }
}

/// Sleep for `total`, waking early once `running` is cleared
fn sleep_while_running(total: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + total;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}
