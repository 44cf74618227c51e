//! Override set - local files that a repository sync must not overwrite

use std::collections::BTreeSet;
use std::path::Path;

/// File names preserved across syncs when a local copy already exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideSet {
    names: BTreeSet<String>,
}

impl OverrideSet {
    pub const DEFAULT_NAMES: [&'static str; 3] = [".env.local", ".env.local.example", "Dockerfile"];

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a file at `path` is covered by the set (matched on file name)
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| self.names.contains(n))
            .unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for OverrideSet {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAMES)
    }
}
