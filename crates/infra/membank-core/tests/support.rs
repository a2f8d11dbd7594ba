//! Shared fixtures: a scripted git oracle and a project laid out under a domains root.

use membank_core::bank::{self, Document};
use membank_core::{BankConfig, GitOracle, Identity, Workspace};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

/// Git state driven by the test instead of a repository.
pub struct ScriptedGit {
    top: PathBuf,
    branch: RefCell<Option<String>>,
    history: RefCell<Vec<String>>,
    refs: RefCell<HashMap<String, String>>,
}

impl ScriptedGit {
    pub fn new(top: &Path, branch: &str) -> Self {
        Self {
            top: top.to_path_buf(),
            branch: RefCell::new(Some(branch.to_string())),
            history: RefCell::new(Vec::new()),
            refs: RefCell::new(HashMap::new()),
        }
    }

    /// Record a reflog entry as the newest.
    pub fn record(&self, entry: &str) {
        self.history.borrow_mut().insert(0, entry.to_string());
    }

    /// Move HEAD to `to`, as `git checkout` would.
    pub fn checkout(&self, from: &str, to: &str) {
        self.record(&format!("checkout: moving from {from} to {to}"));
        self.set_branch(to);
    }

    pub fn set_branch(&self, branch: &str) {
        *self.branch.borrow_mut() = Some(branch.to_string());
    }

    /// Detach HEAD; the workspace then resolves to the branchless identity.
    pub fn detach(&self) {
        *self.branch.borrow_mut() = None;
    }

    pub fn point(&self, sha: &str, branch: &str) {
        self.refs
            .borrow_mut()
            .insert(sha.to_string(), branch.to_string());
    }
}

impl GitOracle for ScriptedGit {
    fn toplevel(&self) -> Option<PathBuf> {
        Some(self.top.clone())
    }

    fn current_branch(&self) -> Option<String> {
        self.branch.borrow().clone()
    }

    fn branch_for_ref(&self, reference: &str) -> Option<String> {
        self.refs.borrow().get(reference).cloned()
    }

    fn recent_history(&self, limit: usize) -> Vec<String> {
        self.history.borrow().iter().take(limit).cloned().collect()
    }

    fn excludes_file(&self) -> Option<PathBuf> {
        None
    }
}

/// A project at `<tmp>/code/domains/acme/app` with its own central root.
pub struct Fixture {
    pub temp: TempDir,
    pub root: PathBuf,
    pub config: BankConfig,
    pub git: ScriptedGit,
}

impl Fixture {
    pub fn new(branch: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path().to_path_buf();
        let root = base.join("code").join("domains").join("acme").join("app");
        fs::create_dir_all(&root).unwrap();
        let config = BankConfig {
            central_root: base.join("central"),
            domains_root: base.join("code").join("domains"),
            legacy_root: base.join("code"),
            hooks_dir: base.join("hooks"),
            global_gitignore: Some(base.join("gitignore_global")),
        };
        let git = ScriptedGit::new(&root, branch);
        Self {
            temp,
            root,
            config,
            git,
        }
    }

    /// Resolve a fresh workspace, as each command invocation does.
    pub fn workspace(&self) -> Workspace {
        Workspace::resolve(&self.root, &self.config, &self.git)
    }

    pub fn identity(&self, branch: &str) -> Identity {
        Identity::new("acme", "app", branch)
    }

    pub fn central_dir(&self, branch: &str) -> PathBuf {
        self.workspace().layout.bank_path(&self.identity(branch))
    }

    pub fn central_doc(&self, branch: &str, doc: Document) -> Option<String> {
        bank::read_document(&self.central_dir(branch), doc).unwrap()
    }

    pub fn local_doc(&self, doc: Document) -> Option<String> {
        bank::read_document(&self.root.join("memory-bank"), doc).unwrap()
    }

    /// Append a bullet to the local `activeContext`.
    pub fn note_locally(&self, line: &str) {
        let local = self.root.join("memory-bank");
        let mut content = bank::read_document(&local, Document::ActiveContext)
            .unwrap()
            .unwrap_or_default();
        content.push_str(line);
        content.push('\n');
        bank::write_document(&local, Document::ActiveContext, &content).unwrap();
    }
}
