//! GitHub-backed `SourceHost`

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::domain::entities::RepositoryRef;
use crate::domain::ports::{SourceHost, SyncReport};
use crate::domain::value_objects::{CommitSha, OverrideSet, RepoSlug};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::{is_non_empty_dir, merge_tree, place_snapshot, MergeReport};
use crate::infrastructure::process::CommandRunner;

use super::api::{GithubApi, FALLBACK_BRANCH};
use super::snapshot::GitSnapshot;

/// Branch and head-commit lookups against the hosting API
///
/// Split out so sync can be exercised without network access.
pub trait BranchResolver: Send + Sync {
    fn default_branch(&self, repo: &RepoSlug) -> DeployResult<String>;
    fn head_commit(&self, repo: &RepoSlug, branch: &str) -> DeployResult<CommitSha>;
}

impl BranchResolver for GithubApi {
    fn default_branch(&self, repo: &RepoSlug) -> DeployResult<String> {
        GithubApi::default_branch(self, repo)
    }

    fn head_commit(&self, repo: &RepoSlug, branch: &str) -> DeployResult<CommitSha> {
        GithubApi::head_commit(self, repo, branch)
    }
}

/// Watches and syncs the same branch of each repository
///
/// A successfully resolved default branch is kept for the life of the host;
/// the fallback is not, so a later lookup can still correct it.
pub struct GithubSourceHost {
    api: Box<dyn BranchResolver>,
    git: GitSnapshot,
    token: Option<String>,
    branches: Mutex<HashMap<String, String>>,
}

impl GithubSourceHost {
    pub fn new(runner: Arc<dyn CommandRunner>, token: Option<String>) -> DeployResult<Self> {
        let api = GithubApi::new(token.clone())?;
        Ok(Self::with_resolver(Box::new(api), runner, token))
    }

    pub fn with_resolver(
        api: Box<dyn BranchResolver>,
        runner: Arc<dyn CommandRunner>,
        token: Option<String>,
    ) -> Self {
        Self {
            api,
            git: GitSnapshot::new(runner),
            token: token.filter(|t| !t.is_empty()),
            branches: Mutex::new(HashMap::new()),
        }
    }

    fn resolve_branch(&self, repo: &RepoSlug) -> String {
        let key = repo.to_string();
        if let Some(branch) = self.branches.lock().ok().and_then(|b| b.get(&key).cloned()) {
            return branch;
        }
        match self.api.default_branch(repo) {
            Ok(branch) => {
                if let Ok(mut branches) = self.branches.lock() {
                    branches.insert(key, branch.clone());
                }
                branch
            }
            Err(e) => {
                tracing::warn!(repo = %repo, error = %e, "could not determine default branch, using '{}'", FALLBACK_BRANCH);
                FALLBACK_BRANCH.to_string()
            }
        }
    }
}

impl SourceHost for GithubSourceHost {
    fn latest_commit(&self, repo: &RepoSlug) -> DeployResult<CommitSha> {
        let branch = self.resolve_branch(repo);
        self.api.head_commit(repo, &branch)
    }

    fn sync_repository(
        &self,
        repo: &RepositoryRef,
        overrides: &OverrideSet,
    ) -> DeployResult<SyncReport> {
        let token = self.token.as_deref().ok_or(DeployError::MissingToken)?;
        let branch = self.resolve_branch(&repo.slug);

        // Stage next to the checkout so the final rename stays on one filesystem
        let parent = repo
            .local_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;
        let staging = tempfile::Builder::new()
            .prefix(".deploy-agent-snapshot-")
            .tempdir_in(parent)?;
        let snapshot = staging.path().join(repo.service.dir_name());

        self.git.fetch(&repo.slug, &branch, token, &snapshot)?;

        let created = !repo.local_path.exists();
        let merged: MergeReport = if created {
            place_snapshot(&snapshot, &repo.local_path)?
        } else {
            merge_tree(&snapshot, &repo.local_path, overrides)?
        };

        verify_checkout(repo)?;

        tracing::info!(
            service = %repo.service,
            branch = %branch,
            written = merged.written.len(),
            unchanged = merged.unchanged.len(),
            preserved = merged.preserved.len(),
            "repository synced"
        );

        Ok(SyncReport {
            branch,
            created,
            written: merged.written,
            unchanged: merged.unchanged,
            preserved: merged.preserved,
        })
    }
}

/// Checkout exists, is non-empty, and has the service's required files
pub fn verify_checkout(repo: &RepositoryRef) -> DeployResult<()> {
    let fail = |message: String| DeployError::Verification {
        service: repo.service,
        path: repo.local_path.clone(),
        message,
    };

    if !is_non_empty_dir(&repo.local_path) {
        return Err(fail("directory is missing or empty".to_string()));
    }
    for required in repo.service.required_files() {
        if !repo.local_path.join(required).is_file() {
            return Err(fail(format!("{} not found", required)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Service;
    use crate::infrastructure::process::testing::ScriptedRunner;
    use crate::infrastructure::process::{CommandOutput, CommandSpec};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::tempdir;

    struct FixedBranch(Option<&'static str>);

    impl BranchResolver for FixedBranch {
        fn default_branch(&self, repo: &RepoSlug) -> DeployResult<String> {
            self.0.map(str::to_string).ok_or_else(|| DeployError::Fetch {
                repo: repo.to_string(),
                message: "offline".into(),
            })
        }

        fn head_commit(&self, _repo: &RepoSlug, _branch: &str) -> DeployResult<CommitSha> {
            Ok(CommitSha::from("aaa111"))
        }
    }

    /// Resolver that records every lookup it answers
    struct RecordingResolver {
        branch: &'static str,
        lookups: Arc<Mutex<Vec<String>>>,
    }

    impl BranchResolver for RecordingResolver {
        fn default_branch(&self, _repo: &RepoSlug) -> DeployResult<String> {
            self.lookups.lock().unwrap().push("default_branch".into());
            Ok(self.branch.to_string())
        }

        fn head_commit(&self, _repo: &RepoSlug, branch: &str) -> DeployResult<CommitSha> {
            self.lookups.lock().unwrap().push(format!("head {}", branch));
            Ok(CommitSha::from("bbb222"))
        }
    }

    /// Runner whose `git clone` writes `files` into the destination
    fn cloning_runner(files: BTreeMap<&'static str, &'static str>) -> Arc<ScriptedRunner> {
        let files = Mutex::new(files);
        Arc::new(ScriptedRunner::new().with(move |cmd: &CommandSpec| {
            if !cmd.starts_with("git", &["-c"]) {
                return None;
            }
            let dest = PathBuf::from(cmd.args.last().unwrap());
            for (rel, content) in files.lock().unwrap().iter() {
                let path = dest.join(rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, content).unwrap();
            }
            fs::create_dir_all(dest.join(".git")).unwrap();
            Some(Ok(CommandOutput::ok("")))
        }))
    }

    fn host(runner: Arc<ScriptedRunner>, branch: Option<&'static str>) -> GithubSourceHost {
        GithubSourceHost::with_resolver(Box::new(FixedBranch(branch)), runner, Some("tok".into()))
    }

    fn backend_repo(base: &Path) -> RepositoryRef {
        RepositoryRef::new(Service::Backend, "https://github.com/org/api.git", base).unwrap()
    }

    #[test]
    fn missing_token_fails_before_any_command() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let host = GithubSourceHost::with_resolver(
            Box::new(FixedBranch(Some("main"))),
            runner.clone(),
            None,
        );

        let err = host
            .sync_repository(&backend_repo(dir.path()), &OverrideSet::default())
            .unwrap_err();
        assert!(matches!(err, DeployError::MissingToken));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn fresh_sync_creates_checkout() {
        let dir = tempdir().unwrap();
        let runner = cloning_runner(BTreeMap::from([
            ("requirements.txt", "fastapi\n"),
            ("app/main.py", "print('hi')\n"),
        ]));
        let repo = backend_repo(dir.path());

        let report = host(runner, Some("develop"))
            .sync_repository(&repo, &OverrideSet::default())
            .unwrap();

        assert!(report.created);
        assert_eq!(report.branch, "develop");
        assert!(repo.local_path.join("app/main.py").is_file());
        assert!(!repo.local_path.join(".git").exists());
    }

    #[test]
    fn branch_lookup_failure_falls_back_to_main() {
        let dir = tempdir().unwrap();
        let runner = cloning_runner(BTreeMap::from([("requirements.txt", "")]));

        let report = host(runner.clone(), None)
            .sync_repository(&backend_repo(dir.path()), &OverrideSet::default())
            .unwrap();

        assert_eq!(report.branch, "main");
        assert!(runner.calls()[0].args.windows(2).any(|w| w == ["--branch", "main"]));
    }

    #[test]
    fn existing_checkout_keeps_overrides_and_local_files() {
        let dir = tempdir().unwrap();
        let repo = backend_repo(dir.path());
        fs::create_dir_all(&repo.local_path).unwrap();
        fs::write(repo.local_path.join(".env.local"), "SECRET=local\n").unwrap();
        fs::write(repo.local_path.join("notes.txt"), "mine\n").unwrap();

        let runner = cloning_runner(BTreeMap::from([
            ("requirements.txt", "fastapi\n"),
            (".env.local", "SECRET=remote\n"),
        ]));
        let report = host(runner, Some("main"))
            .sync_repository(&repo, &OverrideSet::default())
            .unwrap();

        assert!(!report.created);
        assert_eq!(report.preserved, vec![PathBuf::from(".env.local")]);
        assert_eq!(
            fs::read_to_string(repo.local_path.join(".env.local")).unwrap(),
            "SECRET=local\n"
        );
        assert!(repo.local_path.join("notes.txt").is_file());
    }

    #[test]
    fn backend_without_requirements_fails_verification() {
        let dir = tempdir().unwrap();
        let runner = cloning_runner(BTreeMap::from([("main.py", "")]));

        let err = host(runner, Some("main"))
            .sync_repository(&backend_repo(dir.path()), &OverrideSet::default())
            .unwrap_err();
        assert!(matches!(err, DeployError::Verification { .. }));
        assert!(err.to_string().contains("requirements.txt"));
    }

    #[test]
    fn staging_directory_is_cleaned_up() {
        let dir = tempdir().unwrap();
        let runner = cloning_runner(BTreeMap::from([("requirements.txt", "")]));

        host(runner, Some("main"))
            .sync_repository(&backend_repo(dir.path()), &OverrideSet::default())
            .unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".deploy-agent-snapshot-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn watch_and_sync_use_the_same_resolved_branch() {
        let dir = tempdir().unwrap();
        let lookups = Arc::new(Mutex::new(Vec::new()));
        let runner = cloning_runner(BTreeMap::from([("requirements.txt", "")]));
        let host = GithubSourceHost::with_resolver(
            Box::new(RecordingResolver {
                branch: "trunk",
                lookups: lookups.clone(),
            }),
            runner.clone(),
            Some("tok".into()),
        );
        let repo = backend_repo(dir.path());

        let sha = host.latest_commit(&repo.slug).unwrap();
        let report = host
            .sync_repository(&repo, &OverrideSet::default())
            .unwrap();

        assert_eq!(sha.as_str(), "bbb222");
        assert_eq!(report.branch, "trunk");
        assert!(runner.calls()[0].args.windows(2).any(|w| w == ["--branch", "trunk"]));
        assert_eq!(
            *lookups.lock().unwrap(),
            vec!["default_branch".to_string(), "head trunk".to_string()]
        );
    }
}
