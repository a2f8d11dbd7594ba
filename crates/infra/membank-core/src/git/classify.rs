//! Checkout classification and reflog parsing.
//!
//! Git tells a post-checkout hook only the two commit ids and a flag, so
//! whether a checkout created a branch has to be guessed from the HEAD
//! reflog. All functions here are pure: callers gather the inputs from a
//! [`GitOracle`](super::oracle::GitOracle) and decide what to do with the
//! result. The guess can be wrong (reused branch names, a reflog window
//! too short to see older history); callers tolerate both directions.

use crate::error::{BankError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Number of reflog entries inspected per event.
pub const HISTORY_WINDOW: usize = 15;

static MOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"moving from (\S+) to (\S+)").expect("valid regex"));

/// Arguments git passes to the post-checkout hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutEvent {
    pub prev_ref: String,
    pub new_ref: String,
    /// `false` for file checkouts (`git checkout -- path`).
    pub branch_checkout: bool,
}

impl CheckoutEvent {
    /// Build from the raw hook arguments; the flag is `1` for branch checkouts.
    pub fn from_hook_args(prev_ref: &str, new_ref: &str, flag: &str) -> Self {
        Self {
            prev_ref: prev_ref.trim().to_string(),
            new_ref: new_ref.trim().to_string(),
            branch_checkout: flag.trim() == "1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// File-level checkout; no bank operation follows.
    NonBranchCheckout,
    /// A branch that looks newly created, carrying the parent branch name.
    NewBranchFromParent(String),
    ExistingBranchSwitch,
}

/// Classify a checkout.
///
/// `previous` is the human-readable name of `event.prev_ref` when the caller
/// could resolve one, `current` the branch now checked out, and `history` the
/// recent HEAD reflog, newest first (the entry for this checkout included).
///
/// Returns [`BankError::AmbiguousClassification`] when the refs differ but
/// the previous branch cannot be named.
pub fn classify_checkout(
    event: &CheckoutEvent,
    previous: Option<&str>,
    current: &str,
    history: &[String],
) -> Result<Classification> {
    if !event.branch_checkout {
        return Ok(Classification::NonBranchCheckout);
    }
    if event.prev_ref == event.new_ref {
        return Ok(Classification::ExistingBranchSwitch);
    }

    let Some(prev) = previous.filter(|p| !p.is_empty()) else {
        return Err(BankError::AmbiguousClassification {
            prev_ref: event.prev_ref.clone(),
            new_ref: event.new_ref.clone(),
            reason: "previous ref does not name a branch".into(),
        });
    };
    if prev == current {
        return Ok(Classification::ExistingBranchSwitch);
    }

    let latest_is_move = history
        .first()
        .and_then(|entry| parse_move(entry))
        .is_some_and(|(from, to)| from == prev && to == current);
    let seen_before = history.iter().skip(1).any(|entry| mentions(entry, current));

    if latest_is_move || !seen_before {
        Ok(Classification::NewBranchFromParent(prev.to_string()))
    } else {
        Ok(Classification::ExistingBranchSwitch)
    }
}

/// Split a `checkout: moving from <a> to <b>` entry into `(a, b)`.
pub fn parse_move(entry: &str) -> Option<(&str, &str)> {
    let caps = MOVE_RE.captures(entry)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Branch HEAD moved away from in the newest `moving from` entry, if that entry is newest.
pub fn previous_branch(history: &[String]) -> Option<String> {
    let (from, _) = parse_move(history.first()?)?;
    Some(strip_ref_prefix(from).to_string())
}

/// Whether `entry` names `branch` as a whole token.
fn mentions(entry: &str, branch: &str) -> bool {
    entry
        .split_whitespace()
        .map(|tok| tok.trim_matches(|c: char| matches!(c, ':' | ',' | '\'' | '"' | '(' | ')')))
        .any(|tok| strip_ref_prefix(tok) == branch)
}

/// Reduce `refs/heads/x`, `refs/remotes/origin/x` or `origin/x` to `x`.
pub fn strip_ref_prefix(reference: &str) -> &str {
    if let Some(rest) = reference.strip_prefix("refs/heads/") {
        return rest;
    }
    if let Some(rest) = reference.strip_prefix("refs/tags/") {
        return rest;
    }
    if let Some(rest) = reference.strip_prefix("refs/remotes/") {
        return rest.split_once('/').map_or(rest, |(_, branch)| branch);
    }
    for remote in ["origin/", "upstream/"] {
        if let Some(rest) = reference.strip_prefix(remote) {
            return rest;
        }
    }
    reference
}

/// Base branch of the most recent rebase.
///
/// Looks for an `onto <ref>` token in the newest rebase entry that carries
/// one, then falls back to the `rebase (start): checkout <ref>` entry.
/// `None` means callers skip the lineage merge.
pub fn rebase_base(history: &[String]) -> Option<String> {
    let rebase_entries = || history.iter().filter(|e| e.trim_start().starts_with("rebase"));

    let onto = rebase_entries().find_map(|entry| token_after(entry, "onto"));
    let base = onto.or_else(|| {
        rebase_entries()
            .filter(|e| e.contains("(start)"))
            .find_map(|entry| token_after(entry, "checkout"))
    })?;

    let base = strip_ref_prefix(&base).to_string();
    (!base.is_empty()).then_some(base)
}

/// Branch named by the newest `merge <branch>: ...` entry.
pub fn merged_branch(history: &[String]) -> Option<String> {
    history.iter().find_map(|entry| {
        let rest = entry.trim_start().strip_prefix("merge ")?;
        let name = rest.split(':').next()?.trim();
        (!name.is_empty()).then(|| strip_ref_prefix(name).to_string())
    })
}

fn token_after(entry: &str, keyword: &str) -> Option<String> {
    let mut tokens = entry.split_whitespace();
    tokens.find(|t| *t == keyword)?;
    let token = tokens
        .next()?
        .trim_matches(|c: char| matches!(c, ':' | ',' | '\'' | '"'));
    (!token.is_empty()).then(|| token.to_string())
}

/// Whether `reference` looks like an abbreviated or full commit id.
pub fn looks_like_commit(reference: &str) -> bool {
    (7..=40).contains(&reference.len()) && reference.chars().all(|c| c.is_ascii_hexdigit())
}
