//! Configuration loading
//!
//! Precedence, lowest first: built-in defaults, `deploy-agent.toml`, the
//! environment (after `.env.local`), then CLI flags applied by commands.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, DeployResult};

use super::types::{Config, Secret};

pub const CONFIG_FILE: &str = "deploy-agent.toml";
pub const ENV_FILE: &str = ".env.local";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| DeployError::Config {
        source_name: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::Config {
        source_name: path.display().to_string(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load `.env.local` from `base_dir`; variables already set win
///
/// Returns the loaded path, or `None` when there is no such file. Runs
/// before logging is configured, so the caller reports the outcome.
pub fn load_env_file(base_dir: &Path) -> Result<Option<PathBuf>, dotenvy::Error> {
    let path = base_dir.join(ENV_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    dotenvy::from_path(&path)?;
    Ok(Some(path))
}

/// Load the config file (explicit path, else `base_dir/deploy-agent.toml`),
/// then apply process environment overrides
pub fn load(base_dir: &Path, explicit: Option<&Path>) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let (config, warnings) = match explicit {
        Some(path) => load_with_warnings(path)?,
        None => {
            let default_path = base_dir.join(CONFIG_FILE);
            if default_path.is_file() {
                load_with_warnings(&default_path)?
            } else {
                (Config::default(), Vec::new())
            }
        }
    };

    let config = with_env_overrides(config, |key| std::env::var(key).ok())?;
    Ok((config, warnings))
}

/// Apply environment variable overrides
pub fn with_env_overrides(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> DeployResult<Config> {
    let get = |key: &str| get_env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(token) = get("GITHUB_TOKEN") {
        config.github_token = Some(Secret::new(token));
    }
    if let Some(url) = get("FE_REPO_URL") {
        config.repositories.frontend = Some(url);
    }
    if let Some(url) = get("BE_REPO_URL") {
        config.repositories.backend = Some(url);
    }
    if let Some(platform) = get("DOCKER_BUILD_PLATFORM") {
        config.deployment.build_platform = Some(platform);
    }

    if let Some(raw) = get("POLL_INTERVAL") {
        config.watch.poll_interval_secs = parse_interval(&raw).ok_or_else(|| DeployError::Config {
            source_name: "POLL_INTERVAL".to_string(),
            message: format!("expected a positive number of seconds, got '{}'", raw),
        })?;
    }

    if let Some(raw) = get("PORT") {
        config.deployment.backend_port = raw.parse().map_err(|_| DeployError::Config {
            source_name: "PORT".to_string(),
            message: format!("expected a port number, got '{}'", raw),
        })?;
    }

    if config.watch.poll_interval_secs == 0 {
        return Err(DeployError::Config {
            source_name: "watch.poll_interval_secs".to_string(),
            message: "poll interval must be positive".to_string(),
        });
    }

    Ok(config)
}

/// Positive whole seconds
pub fn parse_interval(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "repositories",
        "frontend",
        "backend",
        "deployment",
        "project_name",
        "network_name",
        "frontend_container",
        "backend_container",
        "compose_file",
        "build_platform",
        "backend_port",
        "watch",
        "poll_interval_secs",
        "sync",
        "preserve",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
