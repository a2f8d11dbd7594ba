pub mod archive;
pub mod config;
pub mod create;
pub mod gitignore;
pub mod hook;
pub mod list;
pub mod merge;
pub mod rebase;
pub mod status;
pub mod switch;
pub mod sync;

use anyhow::{Context as _, Result};
use colored::{ColoredString, Colorize};
use membank_core::config::LoadedConfig;
use membank_core::{BankState, Git2Oracle, SyncOutcome, Workspace};
use std::path::{Path, PathBuf};

/// Everything a command needs, resolved once from the current directory.
pub struct Context {
    pub loaded: LoadedConfig,
    pub oracle: Git2Oracle,
    pub cwd: PathBuf,
}

impl Context {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let loaded = membank_core::config::load(config_path)
            .context("Failed to load configuration")?;
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let oracle = Git2Oracle::discover(&cwd);
        Ok(Self {
            loaded,
            oracle,
            cwd,
        })
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::resolve(&self.cwd, &self.loaded.config, &self.oracle)
    }
}

pub fn state_label(state: BankState) -> ColoredString {
    match state {
        BankState::Populated => "present".green(),
        BankState::Empty => "empty".yellow(),
        BankState::Missing => "missing".red(),
    }
}

pub fn check_mark(ok: bool) -> ColoredString {
    if ok { "✓".green() } else { "✗".red() }
}

pub fn describe_sync(outcome: SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Pushed(n) => format!("saved {n} documents to the central bank"),
        SyncOutcome::Pulled(n) => format!("loaded {n} documents from the central bank"),
        SyncOutcome::RestoredLocal(n) => {
            format!("local bank was empty; restored {n} documents")
        }
        SyncOutcome::InitializedLocal => "central bank was empty; initialized local bank".into(),
        SyncOutcome::NothingToSync => "nothing to sync".into(),
    }
}
