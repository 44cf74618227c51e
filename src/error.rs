//! Error types for deploy-agent
//!
//! Library code returns [`DeployError`]; the binary wraps it in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::Service;

/// Result type alias for deploy-agent operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Coarse classification used in JSON events and exit reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    Fetch,
    Build,
    Runtime,
    Setup,
}

/// Main error type for deploy-agent operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// No access token configured
    #[error("GITHUB_TOKEN is not set - add it to .env.local or the environment")]
    MissingToken,

    /// No repository URL configured for a service
    #[error("no repository URL configured for {service} (use --{flag} or {env})")]
    MissingRepoUrl {
        service: Service,
        flag: &'static str,
        env: &'static str,
    },

    /// URL is not a recognizable GitHub repository
    #[error("invalid GitHub repository URL: {url}")]
    InvalidRepoUrl { url: String },

    /// Token rejected or lacks access
    #[error("access denied for {repo}: {message}")]
    Auth { repo: String, message: String },

    /// Remote unreachable or transfer failed
    #[error("failed to fetch {repo}: {message}")]
    Fetch { repo: String, message: String },

    /// Synced directory is empty or missing required files
    #[error("{service} checkout at {path} failed verification: {message}")]
    Verification {
        service: Service,
        path: PathBuf,
        message: String,
    },

    /// Local environment setup failed
    #[error("{service} bootstrap failed: {message}")]
    Bootstrap { service: Service, message: String },

    /// Neither `docker compose` nor `docker-compose` is available
    #[error("neither 'docker compose' nor 'docker-compose' was found")]
    ComposeNotFound,

    /// Compose file missing from the compose directory
    #[error("compose file not found: {path}")]
    ComposeFileMissing { path: PathBuf },

    /// Image build exited nonzero
    #[error("image build failed: {message}")]
    Build { message: String },

    /// Container start/stop exited nonzero
    #[error("container runtime failed: {message}")]
    Runtime { message: String },

    /// Invalid configuration value or file
    #[error("invalid configuration in {source_name}: {message}")]
    Config { source_name: String, message: String },

    /// State file unreadable or unwritable
    #[error("state file {path}: {message}")]
    State { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth { .. } | Self::MissingToken => ErrorKind::Auth,
            Self::Fetch { .. } | Self::Verification { .. } => ErrorKind::Fetch,
            Self::Build { .. } | Self::Bootstrap { .. } => ErrorKind::Build,
            Self::Runtime { .. } | Self::ComposeNotFound | Self::ComposeFileMissing { .. } => {
                ErrorKind::Runtime
            }
            Self::MissingRepoUrl { .. }
            | Self::InvalidRepoUrl { .. }
            | Self::Config { .. }
            | Self::State { .. }
            | Self::Io(_) => ErrorKind::Setup,
        }
    }
}
