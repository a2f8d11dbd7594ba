//! Git hook entry points.
//!
//! Each hook keeps the project-local bank and the central banks in step
//! with a git event. Hooks run inside git, so [`run_hook`] never fails:
//! errors are logged and carried in the [`HookReport`].

use crate::bank::{self, BankState, Document};
use crate::error::{BankError, Result};
use crate::git::classify::{
    looks_like_commit, merged_branch, parse_move, previous_branch, rebase_base, strip_ref_prefix,
};
use crate::git::{CheckoutEvent, Classification, GitOracle, HISTORY_WINDOW, classify_checkout};
use crate::identity::{Identity, NO_BRANCH};
use crate::lineage::{self, MERGE_EVENT_HEADING, MergeReport, Provenance, REBASE_EVENT_HEADING};
use crate::sync::{self, SyncOutcome};
use crate::utils::timestamp;
use crate::workspace::Workspace;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookKind {
    PreCheckout,
    PostCheckout,
    PostMerge,
    PostRebase,
}

impl HookKind {
    pub const ALL: [Self; 4] = [
        Self::PreCheckout,
        Self::PostCheckout,
        Self::PostMerge,
        Self::PostRebase,
    ];

    /// Name of the shim script git runs.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::PreCheckout => "pre-checkout",
            Self::PostCheckout => "post-checkout",
            Self::PostMerge => "post-merge",
            Self::PostRebase => "post-rebase",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for HookKind {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.file_name() == s)
            .ok_or_else(|| BankError::UnknownCommand {
                command: s.to_string(),
            })
    }
}

/// One thing a hook did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum HookStep {
    Skipped { reason: String },
    Flushed { identity: Identity, outcome: SyncOutcome },
    Classified { classification: String },
    Inherited { parent: Identity, documents: usize },
    Initialized { identity: Identity },
    Loaded { outcome: SyncOutcome },
    Noted { heading: &'static str },
    Merged { base: Identity, report: MergeReport },
    GitignoreChecked { ok: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct HookReport {
    pub hook: HookKind,
    pub identity: Identity,
    pub steps: Vec<HookStep>,
    pub error: Option<String>,
}

impl HookReport {
    pub fn new(hook: HookKind, identity: &Identity) -> Self {
        Self {
            hook,
            identity: identity.clone(),
            steps: Vec::new(),
            error: None,
        }
    }

    fn push(&mut self, step: HookStep) {
        debug!("{}: {:?}", self.hook, step);
        self.steps.push(step);
    }
}

/// Run `kind` with git's raw arguments. Never fails.
pub fn run_hook(
    ws: &Workspace,
    oracle: &dyn GitOracle,
    kind: HookKind,
    args: &[String],
) -> HookReport {
    let arg = |i: usize| args.get(i).map(String::as_str);

    let mut report = HookReport::new(kind, &ws.identity);
    let result = match kind {
        HookKind::PreCheckout => pre_checkout(ws, &mut report),
        HookKind::PostCheckout => {
            let event = CheckoutEvent::from_hook_args(
                arg(0).unwrap_or_default(),
                arg(1).unwrap_or_default(),
                arg(2).unwrap_or("1"),
            );
            post_checkout(ws, oracle, &event, &mut report)
        }
        HookKind::PostMerge => post_merge(ws, oracle, arg(0) == Some("1"), &mut report),
        HookKind::PostRebase => post_rebase(ws, oracle, arg(0), &mut report),
    };

    if let Err(e) = result {
        warn!("{} hook failed for {}: {}", kind, ws.identity, e);
        report.error = Some(e.to_string());
    }
    report
}

/// Flush the local bank to the current branch's central bank.
pub fn pre_checkout(ws: &Workspace, report: &mut HookReport) -> Result<()> {
    let outcome = sync::sync_to_central(&ws.layout, &ws.root, &ws.identity)?;
    report.push(HookStep::Flushed {
        identity: ws.identity.clone(),
        outcome,
    });
    Ok(())
}

/// Name of the branch HEAD left, from the reflog first and the ref second.
fn departing_branch(
    event: &CheckoutEvent,
    current: &str,
    history: &[String],
    oracle: &dyn GitOracle,
) -> Option<String> {
    let from_move = history
        .first()
        .and_then(|entry| parse_move(entry))
        .filter(|(_, to)| strip_ref_prefix(to) == current)
        .map(|(from, _)| strip_ref_prefix(from).to_string());

    from_move
        .or_else(|| oracle.branch_for_ref(&event.prev_ref))
        .or_else(|| previous_branch(history))
        .filter(|name| !looks_like_commit(name))
}

/// Whether HEAD was detached before this checkout, judged from the newest move entry.
fn left_detached(current: &str, history: &[String]) -> bool {
    history
        .first()
        .and_then(|entry| parse_move(entry))
        .is_some_and(|(from, to)| strip_ref_prefix(to) == current && looks_like_commit(from))
}

/// Load the bank for the branch just checked out.
///
/// Git has no pre-checkout hook, so the local bank still holds the departing
/// branch's documents when this runs; they are flushed to that branch first.
pub fn post_checkout(
    ws: &Workspace,
    oracle: &dyn GitOracle,
    event: &CheckoutEvent,
    report: &mut HookReport,
) -> Result<()> {
    if !event.branch_checkout {
        report.push(HookStep::Skipped {
            reason: "file checkout".into(),
        });
        return Ok(());
    }

    let current = ws.identity.branch.as_str();
    let history = oracle.recent_history(HISTORY_WINDOW);
    let previous = departing_branch(event, current, &history, oracle);

    let classification = match classify_checkout(event, previous.as_deref(), current, &history) {
        Ok(c) => c,
        Err(e @ BankError::AmbiguousClassification { .. }) => {
            warn!("{e}; treating as a switch to an existing branch");
            Classification::ExistingBranchSwitch
        }
        Err(e) => return Err(e),
    };
    report.push(HookStep::Classified {
        classification: format!("{classification:?}"),
    });

    // A detached HEAD works on the branchless bank
    let flush_to = previous
        .as_deref()
        .or_else(|| left_detached(current, &history).then_some(NO_BRANCH));
    if let Some(prev) = flush_to.filter(|p| *p != current) {
        let departing = ws.identity_for(prev);
        let outcome = sync::sync_to_central(&ws.layout, &ws.root, &departing)?;
        report.push(HookStep::Flushed {
            identity: departing,
            outcome,
        });
    }

    let target_state = sync::central_state(&ws.layout, &ws.identity)?;
    match classification {
        Classification::NonBranchCheckout => return Ok(()),
        Classification::NewBranchFromParent(parent) if target_state != BankState::Populated => {
            let parent = ws.identity_for(&parent);
            if sync::central_state(&ws.layout, &parent)? == BankState::Populated {
                let documents = lineage::inherit(&ws.layout, &parent, &ws.identity)?;
                report.push(HookStep::Inherited { parent, documents });
            } else {
                info!("Parent {} has no central bank; initializing {}", parent, ws.identity);
                initialize_central(ws, report)?;
            }
        }
        _ if target_state != BankState::Populated => initialize_central(ws, report)?,
        _ => {}
    }

    let outcome = sync::sync_to_project(&ws.layout, &ws.root, &ws.identity)?;
    report.push(HookStep::Loaded { outcome });
    fix_gitignore(ws, report)
}

/// Flush, record the merge in `activeContext`, and flush again.
pub fn post_merge(
    ws: &Workspace,
    oracle: &dyn GitOracle,
    squash: bool,
    report: &mut HookReport,
) -> Result<()> {
    pre_checkout(ws, report)?;

    let local = ws.local_path();
    if bank::document_path(&local, Document::ActiveContext).is_file() {
        let history = oracle.recent_history(HISTORY_WINDOW);
        let ts = timestamp();
        let mut note = match merged_branch(&history) {
            Some(branch) => format!("- Merged branch `{branch}` on {ts}"),
            None => format!("- Merge completed on {ts}"),
        };
        if squash {
            note.push_str(" (squash)");
        }
        bank::append_section(&local, Document::ActiveContext, MERGE_EVENT_HEADING, &note)?;
        report.push(HookStep::Noted {
            heading: MERGE_EVENT_HEADING,
        });
        pre_checkout(ws, report)?;
    }

    fix_gitignore(ws, report)
}

/// Record a rebase and merge the base branch's sections into the current bank.
///
/// `command` is the argument git passes (`rebase` or `amend`); amends are ignored.
pub fn post_rebase(
    ws: &Workspace,
    oracle: &dyn GitOracle,
    command: Option<&str>,
    report: &mut HookReport,
) -> Result<()> {
    if command == Some("amend") {
        report.push(HookStep::Skipped {
            reason: "commit amend".into(),
        });
        return Ok(());
    }

    let history = oracle.recent_history(HISTORY_WINDOW);
    let base = rebase_base(&history).and_then(|b| {
        if looks_like_commit(&b) {
            oracle.branch_for_ref(&b)
        } else {
            Some(b)
        }
    });
    debug!("Rebase base for {}: {:?}", ws.identity, base);

    pre_checkout(ws, report)?;

    let local = ws.local_path();
    if bank::document_path(&local, Document::ActiveContext).is_file() {
        let ts = timestamp();
        let note = base.as_deref().map_or_else(
            || format!("- Rebase completed on {ts}"),
            |b| format!("- Rebased onto `{b}` on {ts}"),
        );
        bank::append_section(&local, Document::ActiveContext, REBASE_EVENT_HEADING, &note)?;
        report.push(HookStep::Noted {
            heading: REBASE_EVENT_HEADING,
        });
        pre_checkout(ws, report)?;
    }

    if let Some(base) = base.filter(|b| *b != ws.identity.branch) {
        let base = ws.identity_for(&base);
        if sync::central_state(&ws.layout, &base)? == BankState::Populated
            && sync::central_state(&ws.layout, &ws.identity)? != BankState::Missing
        {
            let merged =
                lineage::merge_with(&ws.layout, &base, &ws.identity, Provenance::Rebased)?;
            report.push(HookStep::Merged {
                base,
                report: merged,
            });
        } else {
            info!("No banks to merge between {} and {}", base, ws.identity);
        }
    }

    let outcome = sync::sync_to_project(&ws.layout, &ws.root, &ws.identity)?;
    report.push(HookStep::Loaded { outcome });
    fix_gitignore(ws, report)
}

fn initialize_central(ws: &Workspace, report: &mut HookReport) -> Result<()> {
    bank::initialize(&ws.central_path())?;
    report.push(HookStep::Initialized {
        identity: ws.identity.clone(),
    });
    Ok(())
}

fn fix_gitignore(ws: &Workspace, report: &mut HookReport) -> Result<()> {
    let status = ws.fix_gitignore()?;
    report.push(HookStep::GitignoreChecked { ok: status.is_ok() });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_names_round_trip() {
        for kind in HookKind::ALL {
            assert_eq!(kind.file_name().parse::<HookKind>().ok(), Some(kind));
        }
    }

    #[test]
    fn unknown_hook_name() {
        let err = "post-commit".parse::<HookKind>().unwrap_err();
        assert!(matches!(err, BankError::UnknownCommand { command } if command == "post-commit"));
    }
}
