//! Tests for the config module

use super::*;
use crate::domain::value_objects::Service;
use crate::error::DeployError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.deployment.project_name, "jalindeploy");
    assert_eq!(config.deployment.network_name, "jalin-network");
    assert_eq!(config.deployment.backend_port, 8000);
    assert_eq!(config.poll_interval(), Duration::from_secs(300));
    assert!(config.overrides().matches(Path::new(".env.local")));
    assert!(config.repo_url(Service::Frontend).is_none());
    assert!(config.token().is_none());
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
[repositories]
frontend = "https://github.com/org/fe.git"
backend = "https://github.com/org/be"

[deployment]
project_name = "staging"
build_platform = "linux/arm64"

[watch]
poll_interval_secs = 60

[sync]
preserve = [".env"]
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(
        config.repo_url(Service::Frontend),
        Some("https://github.com/org/fe.git")
    );
    assert_eq!(config.deployment.project_name, "staging");
    assert_eq!(config.deployment.network_name, "jalin-network");
    assert_eq!(config.poll_interval(), Duration::from_secs(60));
    assert!(config.overrides().matches(Path::new(".env")));
    assert!(!config.overrides().matches(Path::new("Dockerfile")));
}

#[test]
fn test_unknown_keys_produce_warnings_with_suggestion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "[watch]\npoll_intervl_secs = 10\n").unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(config.watch.poll_interval_secs, 300);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "poll_intervl_secs");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("poll_interval_secs"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "[deployment]\nbackend_port = \"eighty\"\n").unwrap();

    assert!(matches!(
        load_with_warnings(&path),
        Err(DeployError::Config { .. })
    ));
}

#[test]
fn test_env_overrides_file_values() {
    let mut config = Config::default();
    config.repositories.frontend = Some("https://github.com/org/old".into());

    let config = with_env_overrides(
        config,
        env(&[
            ("FE_REPO_URL", "https://github.com/org/new"),
            ("GITHUB_TOKEN", "ghp_x"),
            ("POLL_INTERVAL", "45"),
            ("PORT", "9000"),
            ("DOCKER_BUILD_PLATFORM", "linux/amd64"),
        ]),
    )
    .unwrap();

    assert_eq!(
        config.repo_url(Service::Frontend),
        Some("https://github.com/org/new")
    );
    assert_eq!(config.token().as_deref(), Some("ghp_x"));
    assert_eq!(config.watch.poll_interval_secs, 45);
    assert_eq!(config.deployment.backend_port, 9000);
    assert_eq!(
        config.deployment.build_platform.as_deref(),
        Some("linux/amd64")
    );
}

#[test]
fn test_invalid_poll_interval_is_rejected() {
    for raw in ["0", "-5", "soon"] {
        let result = with_env_overrides(Config::default(), env(&[("POLL_INTERVAL", raw)]));
        assert!(
            matches!(result, Err(DeployError::Config { .. })),
            "accepted POLL_INTERVAL={}",
            raw
        );
    }
}

#[test]
fn test_empty_env_values_are_ignored() {
    let config =
        with_env_overrides(Config::default(), env(&[("GITHUB_TOKEN", "  "), ("PORT", "")]))
            .unwrap();
    assert!(config.token().is_none());
    assert_eq!(config.deployment.backend_port, 8000);
}

#[test]
fn test_secret_is_hidden_from_debug() {
    let config = with_env_overrides(Config::default(), env(&[("GITHUB_TOKEN", "ghp_secret")]))
        .unwrap();
    assert!(!format!("{:?}", config).contains("ghp_secret"));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(load(dir.path(), Some(&missing)).is_err());
}

#[test]
fn test_deployment_target_uses_compose_dir() {
    let config = Config::default();
    let target = config.deployment_target("/srv/app".into());
    assert_eq!(target.container_name(Service::Backend), "jalin-backend");
    assert_eq!(
        target.compose_file_path(),
        Path::new("/srv/app/docker-compose.yml")
    );
}

#[test]
fn test_parse_interval() {
    assert_eq!(parse_interval("60"), Some(60));
    assert_eq!(parse_interval(" 5 "), Some(5));
    assert_eq!(parse_interval("0"), None);
    assert_eq!(parse_interval("1.5"), None);
}
