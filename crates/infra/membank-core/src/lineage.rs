//! Content propagation between central banks of related branches.
//!
//! Merging is append-only: the structural sections of each source document
//! are added under a provenance heading. Nothing is deduplicated, so merging
//! the same source twice yields the sections twice.

use crate::bank::{self, BankState, Document};
use crate::error::{BankError, Result};
use crate::identity::{Identity, Layout};
use crate::sync::sync_to_project;
use crate::utils::timestamp;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const LINEAGE_HEADING: &str = "Branch Lineage";
pub const MERGE_EVENT_HEADING: &str = "Merge Event";
pub const REBASE_EVENT_HEADING: &str = "Rebase Event";

/// How merged content is labelled in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Merged,
    Rebased,
}

impl Provenance {
    fn heading(self, source: &str, ts: &str) -> String {
        let verb = match self {
            Self::Merged => "Merged from",
            Self::Rebased => "Rebased from",
        };
        format!("## {verb} {source} on {ts}")
    }
}

/// Which documents a merge appended to and which it copied outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub appended: Vec<Document>,
    pub copied: Vec<Document>,
}

fn require_source(layout: &Layout, source: &Identity) -> Result<std::path::PathBuf> {
    let path = layout.bank_path(source);
    match bank::state(&path)? {
        BankState::Missing => Err(BankError::SourceMissing {
            identity: source.to_string(),
            path,
        }),
        BankState::Empty => Err(BankError::EmptySource { path }),
        BankState::Populated => Ok(path),
    }
}

fn require_target(layout: &Layout, target: &Identity) -> Result<std::path::PathBuf> {
    let path = layout.bank_path(target);
    if bank::state(&path)? == BankState::Missing {
        return Err(BankError::TargetMissing {
            identity: target.to_string(),
            path,
        });
    }
    Ok(path)
}

/// Everything from the first level-2 heading onward; title and preamble dropped.
pub fn structural_sections(content: &str) -> &str {
    if content.starts_with("## ") {
        return content;
    }
    content
        .find("\n## ")
        .map_or("", |idx| &content[idx + 1..])
}

/// Make `target`'s central bank a copy of `source`'s and record where it came from.
pub fn inherit(layout: &Layout, source: &Identity, target: &Identity) -> Result<usize> {
    let src = require_source(layout, source)?;
    let dst = layout.bank_path(target);

    let copied = match bank::copy_all(&src, &dst)? {
        bank::CopyOutcome::Copied(n) => n,
        bank::CopyOutcome::SourceEmpty => return Err(BankError::EmptySource { path: src }),
    };
    bank::append_section(
        &dst,
        Document::ActiveContext,
        LINEAGE_HEADING,
        &format!("- Created from branch `{}` on {}", source.branch, timestamp()),
    )?;
    info!("Branch {} inherited {} documents from {}", target, copied, source);
    Ok(copied)
}

/// Append `source`'s sections into every document of `target`.
pub fn merge_into(layout: &Layout, source: &Identity, target: &Identity) -> Result<MergeReport> {
    merge_with(layout, source, target, Provenance::Merged)
}

pub fn merge_with(
    layout: &Layout,
    source: &Identity,
    target: &Identity,
    provenance: Provenance,
) -> Result<MergeReport> {
    let src = require_source(layout, source)?;
    let dst = require_target(layout, target)?;

    let ts = timestamp();
    let heading = provenance.heading(&source.branch, &ts);
    let mut report = MergeReport::default();

    for doc in Document::ALL {
        let Some(incoming) = bank::read_document(&src, doc)? else {
            continue;
        };
        match bank::read_document(&dst, doc)? {
            None => {
                bank::write_document(&dst, doc, &incoming)?;
                report.copied.push(doc);
            }
            Some(mut existing) => {
                let sections = structural_sections(&incoming).trim_end();
                let block = if sections.is_empty() {
                    heading.clone()
                } else {
                    format!("{heading}\n\n{sections}")
                };
                bank::store::push_block(&mut existing, &block);
                bank::write_document(&dst, doc, &existing)?;
                report.appended.push(doc);
            }
        }
    }

    info!(
        "{} into {}: {} appended, {} copied",
        heading.trim_start_matches("## "),
        target,
        report.appended.len(),
        report.copied.len()
    );
    Ok(report)
}

/// Record a rebase onto `base`, merge its sections in, and refresh the local bank.
///
/// Both banks are checked before anything is written, so a failed rebase
/// leaves the current central bank untouched.
pub fn rebase_onto(
    layout: &Layout,
    base: &Identity,
    current: &Identity,
    root: &Path,
) -> Result<MergeReport> {
    require_source(layout, base)?;
    let dst = require_target(layout, current)?;
    bank::append_section(
        &dst,
        Document::ActiveContext,
        REBASE_EVENT_HEADING,
        &format!("- Rebased onto `{}` on {}", base.branch, timestamp()),
    )?;
    let report = merge_with(layout, base, current, Provenance::Rebased)?;
    sync_to_project(layout, root, current)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sections_skip_title_and_preamble() {
        let doc = "# Title\n\n*Initialized: now*\n\n## One\n\n- a\n\n## Two\n";
        assert_eq!(structural_sections(doc), "## One\n\n- a\n\n## Two\n");
    }

    #[test]
    fn sections_when_document_starts_with_heading() {
        assert_eq!(structural_sections("## Only\n- x\n"), "## Only\n- x\n");
    }

    #[test]
    fn sections_absent() {
        assert_eq!(structural_sections("# Title\n\nprose\n"), "");
        // level-3 headings are not structural boundaries
        assert_eq!(structural_sections("# T\n### Sub\n"), "");
    }

    #[test]
    fn provenance_headings() {
        assert_eq!(
            Provenance::Merged.heading("feature", "2025-01-01 00:00:00"),
            "## Merged from feature on 2025-01-01 00:00:00"
        );
        assert_eq!(
            Provenance::Rebased.heading("main", "t"),
            "## Rebased from main on t"
        );
    }
}
