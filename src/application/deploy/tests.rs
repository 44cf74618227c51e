//! Deploy Use Case Tests

use super::*;
use crate::application::testing::{
    both_repos, repo, CallLog, FakeBootstrap, FakeRuntime, FakeSourceHost, RecordingSink,
};
use crate::domain::ports::{DeployEvent, DeployEventSink, DeployStep};
use crate::domain::value_objects::Service;
use crate::error::{DeployError, ErrorKind};
use std::sync::Arc;

type FakeDeploy = DeployUseCase<FakeSourceHost, FakeRuntime, FakeBootstrap>;

fn use_case(log: &CallLog, runtime: FakeRuntime) -> FakeDeploy {
    DeployUseCase::new(
        FakeSourceHost::new(log.clone()),
        runtime,
        FakeBootstrap { log: log.clone() },
    )
}

#[test]
fn test_steps_run_in_order() {
    let log = CallLog::default();
    let deploy = use_case(&log, FakeRuntime::new(log.clone()));

    let report = deploy.execute(&DeployOptions::new(both_repos())).unwrap();

    assert_eq!(
        log.calls(),
        vec![
            "sync frontend",
            "sync backend",
            "bootstrap frontend",
            "bootstrap backend",
            "build frontend,backend",
            "stop frontend",
            "stop backend",
            "start frontend,backend",
            "cleanup frontend,backend",
        ]
    );
    assert_eq!(report.services, vec![Service::Frontend, Service::Backend]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_build_failure_leaves_old_containers_running() {
    let log = CallLog::default();
    let deploy = use_case(&log, FakeRuntime::new(log.clone()).failing_builds(1));

    let failure = deploy
        .execute(&DeployOptions::new(both_repos()))
        .unwrap_err();

    assert_eq!(failure.step, DeployStep::Build);
    assert_eq!(failure.source.kind(), ErrorKind::Build);
    assert_eq!(log.count("stop"), 0);
    assert_eq!(log.count("start"), 0);
}

#[test]
fn test_sync_failure_aborts_before_bootstrap() {
    let log = CallLog::default();
    let deploy = use_case(&log, FakeRuntime::new(log.clone()));
    *deploy.source_host().fail_sync.lock().unwrap() = Some(DeployError::Auth {
        repo: "org/fe".into(),
        message: "bad credentials".into(),
    });

    let failure = deploy
        .execute(&DeployOptions::new(both_repos()))
        .unwrap_err();

    assert_eq!(failure.step, DeployStep::Sync);
    assert_eq!(log.calls(), vec!["sync frontend"]);
    assert!(failure.to_string().starts_with("Syncing repositories failed"));
}

#[test]
fn test_start_failure_is_reported_with_runtime_kind() {
    let log = CallLog::default();
    let runtime = FakeRuntime {
        fail_start: true,
        ..FakeRuntime::new(log.clone())
    };
    let deploy = use_case(&log, runtime);
    let sink = Arc::new(RecordingSink::default());

    let failure = deploy
        .execute_with_events(&DeployOptions::new(both_repos()), sink.clone())
        .unwrap_err();

    assert_eq!(failure.step, DeployStep::Start);
    assert_eq!(log.count("cleanup"), 0);
    let last = sink.events().pop().unwrap();
    assert_eq!(
        last,
        DeployEvent::Failed {
            step: DeployStep::Start,
            kind: ErrorKind::Runtime,
            message: "port is already allocated".into(),
        }
    );
}

#[test]
fn test_cleanup_failure_is_only_a_warning() {
    let log = CallLog::default();
    let runtime = FakeRuntime {
        fail_cleanup: true,
        ..FakeRuntime::new(log.clone())
    };
    let deploy = use_case(&log, runtime);
    let sink = Arc::new(RecordingSink::default());

    let report = deploy
        .execute_with_events(&DeployOptions::new(both_repos()), sink.clone())
        .unwrap();

    assert_eq!(report.warnings.len(), 1);
    let events = sink.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, DeployEvent::Warning { message } if message.contains("daemon busy"))));
    assert!(matches!(events.last(), Some(DeployEvent::Completed { .. })));
}

#[test]
fn test_events_cover_every_step() {
    let log = CallLog::default();
    let deploy = use_case(&log, FakeRuntime::new(log.clone()));
    let sink = Arc::new(RecordingSink::default());

    deploy
        .execute_with_events(&DeployOptions::new(both_repos()), sink.clone())
        .unwrap();

    let steps: Vec<DeployStep> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            DeployEvent::StepStarted { step } => Some(step),
            _ => None,
        })
        .collect();
    assert_eq!(steps, DeployStep::ALL.to_vec());

    let removed = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, DeployEvent::ContainerRemoved { .. }))
        .count();
    assert_eq!(removed, 2);
}

#[test]
fn test_only_limits_to_selected_services() {
    let log = CallLog::default();
    let deploy = use_case(&log, FakeRuntime::new(log.clone()));

    let options = DeployOptions::new(both_repos()).only(&[Service::Backend]);
    deploy.execute(&options).unwrap();

    assert_eq!(log.count("sync"), 1);
    assert!(log.calls().contains(&"build backend".to_string()));
    assert!(log.calls().contains(&"stop backend".to_string()));
    assert!(!log.calls().contains(&"stop frontend".to_string()));
}

#[test]
fn test_empty_options_touch_nothing() {
    let log = CallLog::default();
    let deploy = use_case(&log, FakeRuntime::new(log.clone()));
    let sink: Arc<dyn DeployEventSink> = Arc::new(RecordingSink::default());

    let report = deploy
        .execute_with_events(&DeployOptions::new(vec![repo(Service::Frontend)]).only(&[]), sink)
        .unwrap();

    assert!(report.services.is_empty());
    assert!(log.calls().is_empty());
}
