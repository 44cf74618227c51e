//! GitHub REST client
//!
//! Two read-only lookups: a repository's default branch and the head
//! commit of a branch.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::value_objects::{CommitSha, RepoSlug};
use crate::error::{DeployError, DeployResult};

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Branch assumed when the repository lookup fails
pub const FALLBACK_BRANCH: &str = "main";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("deploy-agent/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    sha: String,
}

pub struct GithubApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubApi {
    pub fn new(token: Option<String>) -> DeployResult<Self> {
        Self::with_base_url(GITHUB_API_URL, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> DeployResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DeployError::Config {
                source_name: "http client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn repo_url(&self, repo: &RepoSlug, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url,
            repo.owner(),
            repo.name(),
            suffix
        )
    }

    fn get_json<T: DeserializeOwned>(&self, repo: &RepoSlug, url: &str) -> DeployResult<T> {
        let mut req = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = req.send().map_err(|e| DeployError::Fetch {
            repo: repo.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(repo, status));
        }

        response.json().map_err(|e| DeployError::Fetch {
            repo: repo.to_string(),
            message: format!("unexpected response body: {}", e),
        })
    }

    /// `GET /repos/{owner}/{repo}` → `default_branch`
    pub fn default_branch(&self, repo: &RepoSlug) -> DeployResult<String> {
        let info: RepoInfo = self.get_json(repo, &self.repo_url(repo, ""))?;
        Ok(info
            .default_branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string()))
    }

    /// `GET /repos/{owner}/{repo}/commits/{branch}` → `sha`
    pub fn head_commit(&self, repo: &RepoSlug, branch: &str) -> DeployResult<CommitSha> {
        let suffix = format!("/commits/{}", branch);
        let info: CommitInfo = self.get_json(repo, &self.repo_url(repo, &suffix))?;
        Ok(CommitSha::new(info.sha))
    }
}

fn status_error(repo: &RepoSlug, status: StatusCode) -> DeployError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DeployError::Auth {
            repo: repo.to_string(),
            message: format!("GitHub API returned {}", status),
        },
        _ => DeployError::Fetch {
            repo: repo.to_string(),
            message: format!("GitHub API returned {}", status),
        },
    }
}
