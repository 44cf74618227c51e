//! File System Helpers
//!
//! Snapshot merging and runtime-environment probes.

mod merge;
mod runtime_env;

pub use merge::{is_non_empty_dir, list_files, merge_tree, place_snapshot, MergeReport};
pub use runtime_env::{RuntimeProbe, CONTAINER_PROJECT_DIR};
