//! GitHub Source Host
//!
//! Commit lookups go through the REST API; snapshots through a shallow,
//! token-authorized `git clone`.

mod api;
mod snapshot;
mod source_host;

pub use api::{GithubApi, FALLBACK_BRANCH, GITHUB_API_URL};
pub use snapshot::GitSnapshot;
pub use source_host::{verify_checkout, BranchResolver, GithubSourceHost};
