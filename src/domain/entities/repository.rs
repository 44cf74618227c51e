//! Repository reference entity

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{RepoSlug, Service};
use crate::error::DeployResult;

/// A remote repository and the local directory it is synced into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub service: Service,
    pub url: String,
    pub slug: RepoSlug,
    pub local_path: PathBuf,
}

impl RepositoryRef {
    /// Build a reference for `service`, checked out under `base_dir/<service>`
    pub fn new(service: Service, url: &str, base_dir: &Path) -> DeployResult<Self> {
        Ok(Self {
            service,
            url: url.to_string(),
            slug: RepoSlug::parse(url)?,
            local_path: base_dir.join(service.dir_name()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_uses_service_directory() {
        let repo = RepositoryRef::new(
            Service::Backend,
            "https://github.com/org/api.git",
            Path::new("/srv/deploy"),
        )
        .unwrap();
        assert_eq!(repo.local_path, PathBuf::from("/srv/deploy/backend"));
        assert_eq!(repo.slug.to_string(), "org/api");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(RepositoryRef::new(Service::Frontend, "not-a-url", Path::new(".")).is_err());
    }
}
