//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod commit_sha;
mod override_set;
mod repo_slug;
mod service;

pub use commit_sha::CommitSha;
pub use override_set::OverrideSet;
pub use repo_slug::RepoSlug;
pub use service::Service;
