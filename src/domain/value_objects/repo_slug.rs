//! Repository slug - `owner/name` parsed from a GitHub URL

use crate::error::DeployError;

const GITHUB_HOST: &str = "github.com";

/// Owner and repository name on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a GitHub repository URL
    ///
    /// Accepts `https://github.com/owner/repo`, optionally with a trailing
    /// `/` or `.git`, and the SSH form `git@github.com:owner/repo.git`.
    pub fn parse(url: &str) -> Result<Self, DeployError> {
        let invalid = || DeployError::InvalidRepoUrl {
            url: url.to_string(),
        };

        let trimmed = url.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let path = if let Some(rest) = trimmed.strip_prefix("git@github.com:") {
            rest
        } else {
            let (_, after_host) = trimmed.split_once(GITHUB_HOST).ok_or_else(invalid)?;
            after_host.strip_prefix('/').ok_or_else(invalid)?
        };

        let mut parts = path.split('/');
        let owner = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let name = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;

        Ok(Self::new(owner, name))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTPS clone URL without credentials
    pub fn clone_url(&self) -> String {
        format!("https://{}/{}/{}.git", GITHUB_HOST, self.owner, self.name)
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
