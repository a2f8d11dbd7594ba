//! Branch-aware memory banks.
//!
//! A memory bank is a directory of five markdown documents kept inside a
//! project (`memory-bank/`) and mirrored per git branch under a central
//! root. This crate resolves which bank a directory belongs to, copies
//! documents between the two locations, carries content across branch
//! creation, merges and rebases, and classifies git checkout events.

pub mod bank;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod identity;
pub mod lineage;
pub mod sync;
pub mod utils;
pub mod workspace;

pub use bank::{BankState, Document};
pub use config::{BankConfig, LoadedConfig};
pub use error::{BankError, Result};
pub use git::{Git2Oracle, GitOracle};
pub use hooks::{HookKind, HookReport, run_hook};
pub use identity::{Identity, Layout};
pub use sync::SyncOutcome;
pub use workspace::{NewBankChoice, Workspace};
