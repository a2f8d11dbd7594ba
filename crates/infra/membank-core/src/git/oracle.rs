//! Read-only view of git state.
//!
//! Everything the engine needs from git goes through [`GitOracle`]: the
//! work tree root, the current branch, ref-to-branch names, recent HEAD
//! reflog messages and the user's global excludes file. The engine never
//! writes to the repository.

use git2::{BranchType, Repository};
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait GitOracle {
    /// Top-level directory of the work tree, if inside one.
    fn toplevel(&self) -> Option<PathBuf>;

    /// Current branch, `None` when detached, unborn or not in git.
    fn current_branch(&self) -> Option<String>;

    /// Local branch name pointing at `reference` (a sha or ref name).
    fn branch_for_ref(&self, reference: &str) -> Option<String>;

    /// Most recent HEAD reflog messages, newest first.
    fn recent_history(&self, limit: usize) -> Vec<String>;

    /// Path configured as `core.excludesFile`.
    fn excludes_file(&self) -> Option<PathBuf>;
}

/// [`GitOracle`] backed by libgit2.
pub struct Git2Oracle {
    repo: Option<Repository>,
}

impl Git2Oracle {
    /// Discover the repository containing `start`. Outside git every query returns nothing.
    pub fn discover(start: &Path) -> Self {
        let repo = match Repository::discover(start) {
            Ok(repo) => Some(repo),
            Err(e) => {
                debug!("No git repository at {}: {}", start.display(), e.message());
                None
            }
        };
        Self { repo }
    }

    pub fn is_repo(&self) -> bool {
        self.repo.is_some()
    }
}

impl GitOracle for Git2Oracle {
    fn toplevel(&self) -> Option<PathBuf> {
        self.repo
            .as_ref()?
            .workdir()
            .map(|p| p.components().collect::<PathBuf>())
    }

    fn current_branch(&self) -> Option<String> {
        let head = self.repo.as_ref()?.head().ok()?;
        if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        }
    }

    fn branch_for_ref(&self, reference: &str) -> Option<String> {
        let repo = self.repo.as_ref()?;
        if repo.find_branch(reference, BranchType::Local).is_ok() {
            return Some(reference.to_string());
        }

        let oid = repo.revparse_single(reference).ok()?.peel_to_commit().ok()?.id();
        let current = self.current_branch();
        let mut names: Vec<String> = repo
            .branches(Some(BranchType::Local))
            .ok()?
            .filter_map(|b| b.ok())
            .filter(|(b, _)| b.get().target() == Some(oid))
            .filter_map(|(b, _)| b.name().ok().flatten().map(str::to_string))
            .collect();
        names.sort();

        // A fresh branch shares its parent's commit; prefer the other name.
        if names.len() > 1
            && let Some(cur) = current
        {
            names.retain(|n| *n != cur);
        }
        names.into_iter().next()
    }

    fn recent_history(&self, limit: usize) -> Vec<String> {
        let Some(repo) = self.repo.as_ref() else {
            return Vec::new();
        };
        match repo.reflog("HEAD") {
            Ok(reflog) => reflog
                .iter()
                .take(limit)
                .map(|e| e.message().unwrap_or_default().to_string())
                .collect(),
            Err(e) => {
                debug!("No HEAD reflog: {}", e.message());
                Vec::new()
            }
        }
    }

    fn excludes_file(&self) -> Option<PathBuf> {
        let config = match self.repo.as_ref() {
            Some(repo) => repo.config().ok()?,
            None => git2::Config::open_default().ok()?,
        };
        config.get_path("core.excludesfile").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn initial_commit(repo: &Repository) -> git2::Oid {
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree_id = {
            let mut idx = repo.index().unwrap();
            idx.write_tree().unwrap()
        };
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
            .unwrap()
    }

    #[test]
    fn outside_git_everything_is_empty() {
        let temp = TempDir::new().unwrap();
        let oracle = Git2Oracle::discover(temp.path());
        assert!(!oracle.is_repo());
        assert!(oracle.toplevel().is_none());
        assert!(oracle.current_branch().is_none());
        assert!(oracle.recent_history(10).is_empty());
        assert!(oracle.branch_for_ref("main").is_none());
    }

    #[test]
    fn unborn_branch_has_no_name() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let oracle = Git2Oracle::discover(temp.path());
        assert!(oracle.is_repo());
        assert!(oracle.current_branch().is_none());
    }

    #[test]
    fn branch_names_and_refs() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let oid = initial_commit(&repo);
        let commit = repo.find_commit(oid).unwrap();
        repo.branch("feature", &commit, false).unwrap();
        repo.set_head("refs/heads/feature").unwrap();

        let oracle = Git2Oracle::discover(temp.path());
        assert_eq!(oracle.current_branch().as_deref(), Some("feature"));

        // Both branches point at the commit; the non-current one wins.
        let parent = oracle.branch_for_ref(&oid.to_string()).unwrap();
        assert!(parent == "master" || parent == "main");

        assert_eq!(oracle.branch_for_ref("feature").as_deref(), Some("feature"));
        assert!(oracle.branch_for_ref("0000000").is_none());
    }

    #[test]
    fn detached_head_has_no_branch() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let oid = initial_commit(&repo);
        repo.set_head_detached(oid).unwrap();

        let oracle = Git2Oracle::discover(temp.path());
        assert!(oracle.current_branch().is_none());
    }
}
