//! Service value object - the two deployable applications

use serde::{Deserialize, Serialize};

/// A deployable service (one repository, one image, one container)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Frontend,
    Backend,
}

impl Service {
    /// Both services, in deploy order
    pub const ALL: [Service; 2] = [Service::Frontend, Service::Backend];

    /// Service name as declared in the compose file
    pub fn compose_name(&self) -> &'static str {
        match self {
            Service::Frontend => "frontend",
            Service::Backend => "backend",
        }
    }

    /// Local checkout directory name under the base directory
    pub fn dir_name(&self) -> &'static str {
        self.compose_name()
    }

    /// Files that must exist in a synced checkout
    pub fn required_files(&self) -> &'static [&'static str] {
        match self {
            Service::Frontend => &[],
            Service::Backend => &["requirements.txt"],
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.compose_name())
    }
}
