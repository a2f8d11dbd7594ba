//! Per-invocation context and the user-facing bank operations.
//!
//! [`Workspace::resolve`] runs once per command: it fixes the project root,
//! identity and storage layout, and every operation below works from those
//! values rather than re-reading the current directory or git.

use crate::bank::{self, BankState};
use crate::config::BankConfig;
use crate::error::{BankError, Result};
use crate::git::GitOracle;
use crate::hooks::HookKind;
use crate::identity::{ARCHIVE_DIR, Identity, Layout, local_path, resolve_identity, resolve_root};
use crate::lineage::{self, MergeReport};
use crate::sync::{self, SyncOutcome};
use crate::utils::gitignore::{self, GitignoreStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How to seed a branch that has no central bank yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NewBankChoice {
    /// Copy the departing branch's bank and record the lineage.
    Inherit,
    /// Start from empty templates.
    Initialize,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub identity: Identity,
    pub layout: Layout,
    pub hooks_dir: PathBuf,
    pub global_gitignore: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HookStatus {
    pub name: &'static str,
    pub installed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub identity: Identity,
    pub root: PathBuf,
    pub local_path: PathBuf,
    pub local_state: BankState,
    pub central_path: PathBuf,
    pub central_state: BankState,
    pub gitignore: GitignoreStatus,
    pub hooks_dir: PathBuf,
    pub hooks: Vec<HookStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    Created,
    /// Central bank already existed; it was synced rather than reinitialized.
    AlreadyExisted,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwitchReport {
    pub from: Identity,
    pub to: Identity,
    pub flushed: SyncOutcome,
    pub created: Option<NewBankChoice>,
    pub loaded: SyncOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchEntry {
    pub branch: String,
    pub documents: usize,
    pub current: bool,
}

impl Workspace {
    /// Resolve root and identity from `start`, once.
    pub fn resolve(start: &Path, config: &BankConfig, oracle: &dyn GitOracle) -> Self {
        let root = resolve_root(start, oracle);
        let layout = Layout::from_config(config);
        let identity = resolve_identity(&root, &layout, oracle);
        let global_gitignore = config
            .global_gitignore
            .clone()
            .or_else(|| oracle.excludes_file())
            .or_else(|| dirs::home_dir().map(|h| h.join(".gitignore_global")));
        debug!("Resolved {} at {}", identity, root.display());
        Self {
            root,
            identity,
            layout,
            hooks_dir: config.hooks_dir.clone(),
            global_gitignore,
        }
    }

    pub fn local_path(&self) -> PathBuf {
        local_path(&self.root)
    }

    pub fn central_path(&self) -> PathBuf {
        self.layout.bank_path(&self.identity)
    }

    /// Identity of another branch of this project.
    pub fn identity_for(&self, branch: &str) -> Identity {
        self.identity.with_branch(branch)
    }

    pub fn gitignore_status(&self) -> Result<GitignoreStatus> {
        gitignore::check(&self.root, self.global_gitignore.as_deref())
    }

    pub fn fix_gitignore(&self) -> Result<GitignoreStatus> {
        gitignore::fix(&self.root, self.global_gitignore.as_deref())
    }

    pub fn status(&self) -> Result<StatusReport> {
        let hooks = HookKind::ALL
            .iter()
            .map(|k| HookStatus {
                name: k.file_name(),
                installed: self.hooks_dir.join(k.file_name()).is_file(),
            })
            .collect();
        Ok(StatusReport {
            identity: self.identity.clone(),
            root: self.root.clone(),
            local_path: self.local_path(),
            local_state: bank::state(&self.local_path())?,
            central_path: self.central_path(),
            central_state: bank::state(&self.central_path())?,
            gitignore: self.gitignore_status()?,
            hooks_dir: self.hooks_dir.clone(),
            hooks,
        })
    }

    /// Initialize the central bank and load it locally.
    ///
    /// An existing central bank is only reinitialized with `force`; otherwise
    /// it is synced both ways so local edits are kept.
    pub fn create(&self, force: bool) -> Result<CreateOutcome> {
        let central = self.central_path();
        let outcome = if !force && bank::state(&central)? == BankState::Populated {
            info!("Central bank for {} already exists", self.identity);
            sync::sync_bidirectional(&self.layout, &self.root, &self.identity)?;
            CreateOutcome::AlreadyExisted
        } else {
            bank::initialize(&central)?;
            sync::sync_to_project(&self.layout, &self.root, &self.identity)?;
            CreateOutcome::Created
        };
        self.fix_gitignore()?;
        Ok(outcome)
    }

    /// Flush the current bank, then load `target` (the current branch when `None`).
    ///
    /// `choose` is consulted only when the target has no central bank and
    /// differs from the current branch.
    pub fn switch<F>(&self, target: Option<&str>, choose: F) -> Result<SwitchReport>
    where
        F: FnOnce(&Identity, &Identity) -> Result<NewBankChoice>,
    {
        let current = &self.identity;
        let to = target.map_or_else(|| current.clone(), |b| self.identity_for(b));

        let flushed = sync::sync_to_central(&self.layout, &self.root, current)?;

        let mut created = None;
        if sync::central_state(&self.layout, &to)? != BankState::Populated {
            let choice = if to == *current {
                NewBankChoice::Initialize
            } else {
                choose(current, &to)?
            };
            match choice {
                NewBankChoice::Inherit
                    if sync::central_state(&self.layout, current)? == BankState::Populated =>
                {
                    lineage::inherit(&self.layout, current, &to)?;
                    created = Some(NewBankChoice::Inherit);
                }
                _ => {
                    bank::initialize(&self.layout.bank_path(&to))?;
                    created = Some(NewBankChoice::Initialize);
                }
            }
        }

        let loaded = sync::sync_to_project(&self.layout, &self.root, &to)?;
        info!("Switched memory bank from {} to {}", current, to);
        Ok(SwitchReport {
            from: current.clone(),
            to,
            flushed,
            created,
            loaded,
        })
    }

    pub fn sync(&self) -> Result<(SyncOutcome, SyncOutcome)> {
        sync::sync_bidirectional(&self.layout, &self.root, &self.identity)
    }

    /// Branches with a central bank for this project, sorted by name.
    pub fn list(&self) -> Result<Vec<BranchEntry>> {
        let dir = self.layout.project_path(&self.identity);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let current_dir = self.central_path();
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !path.is_dir() || name == ARCHIVE_DIR || name.starts_with('.') {
                continue;
            }
            entries.push(BranchEntry {
                documents: bank::documents(&path)?.len(),
                current: path == current_dir,
                branch: name,
            });
        }
        entries.sort_by(|a, b| a.branch.cmp(&b.branch));
        Ok(entries)
    }

    /// Move a branch's central bank under `archive/<branch>-<date>`.
    pub fn archive(&self, branch: Option<&str>, today: NaiveDate) -> Result<PathBuf> {
        let id = branch.map_or_else(|| self.identity.clone(), |b| self.identity_for(b));
        let src = self.layout.bank_path(&id);
        if !src.is_dir() {
            return Err(BankError::SourceMissing {
                identity: id.to_string(),
                path: src,
            });
        }

        let base = self.layout.archive_path(&id, today);
        let mut dest = base.clone();
        let mut n = 2;
        while dest.exists() {
            let name = format!(
                "{}-{}",
                base.file_name().map(|s| s.to_string_lossy()).unwrap_or_default(),
                n
            );
            dest = base.with_file_name(name);
            n += 1;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&src, &dest)?;
        info!("Archived {} to {}", id, dest.display());
        Ok(dest)
    }

    /// Flush local edits, append `source`'s sections, and reload.
    pub fn merge(&self, source: &str) -> Result<MergeReport> {
        let source = self.identity_for(source);
        sync::sync_to_central(&self.layout, &self.root, &self.identity)?;
        let report = lineage::merge_into(&self.layout, &source, &self.identity)?;
        sync::sync_to_project(&self.layout, &self.root, &self.identity)?;
        Ok(report)
    }

    /// Flush local edits, then record and merge a rebase onto `base`.
    pub fn rebase(&self, base: &str) -> Result<MergeReport> {
        let base = self.identity_for(base);
        sync::sync_to_central(&self.layout, &self.root, &self.identity)?;
        lineage::rebase_onto(&self.layout, &base, &self.identity, &self.root)
    }
}
