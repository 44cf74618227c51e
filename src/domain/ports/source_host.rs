//! Source host port
//!
//! Abstracts the source-control hosting service: commit lookups for the
//! watcher and snapshot syncs for the orchestrator.

use std::path::PathBuf;

use crate::domain::entities::RepositoryRef;
use crate::domain::value_objects::{CommitSha, OverrideSet, RepoSlug};
use crate::error::DeployResult;

/// Outcome of syncing one repository into its local directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Branch the snapshot was taken from
    pub branch: String,
    /// Local directory did not exist and was populated from scratch
    pub created: bool,
    /// Files copied from the remote (new or changed)
    pub written: Vec<PathBuf>,
    /// Files already byte-identical to the remote
    pub unchanged: Vec<PathBuf>,
    /// Override-set files left untouched
    pub preserved: Vec<PathBuf>,
}

/// Source-control host operations
pub trait SourceHost {
    /// Head commit of the repository's default branch
    fn latest_commit(&self, repo: &RepoSlug) -> DeployResult<CommitSha>;

    /// Bring `repo.local_path` up to date with the remote default branch
    ///
    /// Creates the directory when missing. Otherwise merges: remote files
    /// overwrite local ones, except override-set files already present
    /// locally; files that exist only locally are kept.
    fn sync_repository(
        &self,
        repo: &RepositoryRef,
        overrides: &OverrideSet,
    ) -> DeployResult<SyncReport>;
}
