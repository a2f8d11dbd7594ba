//! Whole-document copies between a project-local bank and its central bank.
//!
//! There is no field-level merge: whichever side is copied overwrites the
//! other. The two directions are not symmetric when the source is empty,
//! so an empty local directory never wipes a populated central bank.

use crate::bank::{self, BankState, CopyOutcome};
use crate::error::Result;
use crate::identity::{Identity, Layout, local_path};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "documents", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Local documents copied over the central bank.
    Pushed(usize),
    /// Central documents copied over the local bank.
    Pulled(usize),
    /// Local was empty, so it was refilled from central instead of pushing.
    RestoredLocal(usize),
    /// Central had nothing, so local was seeded from templates.
    InitializedLocal,
    /// Neither side has documents.
    NothingToSync,
}

/// Copy the local bank over the central bank for `identity`.
pub fn sync_to_central(layout: &Layout, root: &Path, identity: &Identity) -> Result<SyncOutcome> {
    let local = local_path(root);
    let central = layout.bank_path(identity);

    match bank::copy_all(&local, &central)? {
        CopyOutcome::Copied(n) => {
            info!("Synced {} documents to central bank {}", n, identity);
            Ok(SyncOutcome::Pushed(n))
        }
        CopyOutcome::SourceEmpty => match bank::copy_all(&central, &local)? {
            CopyOutcome::Copied(n) => {
                info!("Local bank empty; restored {} documents from {}", n, identity);
                Ok(SyncOutcome::RestoredLocal(n))
            }
            CopyOutcome::SourceEmpty => {
                debug!("No documents on either side for {}", identity);
                Ok(SyncOutcome::NothingToSync)
            }
        },
    }
}

/// Copy the central bank for `identity` over the local bank.
pub fn sync_to_project(layout: &Layout, root: &Path, identity: &Identity) -> Result<SyncOutcome> {
    let local = local_path(root);
    let central = layout.bank_path(identity);

    match bank::copy_all(&central, &local)? {
        CopyOutcome::Copied(n) => {
            info!("Loaded {} documents from central bank {}", n, identity);
            Ok(SyncOutcome::Pulled(n))
        }
        CopyOutcome::SourceEmpty => {
            bank::initialize(&local)?;
            info!("Central bank {} empty; initialized local bank", identity);
            Ok(SyncOutcome::InitializedLocal)
        }
    }
}

/// Push then pull. Content present only locally survives the round trip.
pub fn sync_bidirectional(
    layout: &Layout,
    root: &Path,
    identity: &Identity,
) -> Result<(SyncOutcome, SyncOutcome)> {
    let pushed = sync_to_central(layout, root, identity)?;
    let pulled = sync_to_project(layout, root, identity)?;
    Ok((pushed, pulled))
}

/// State of the central bank for `identity`.
pub fn central_state(layout: &Layout, identity: &Identity) -> Result<BankState> {
    bank::state(&layout.bank_path(identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{Document, read_document, write_document};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        layout: Layout,
        root: PathBuf,
        id: Identity,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let layout = Layout {
            central_root: temp.path().join("central"),
            domains_root: temp.path().join("code/domains"),
            legacy_root: temp.path().join("code"),
        };
        let root = temp.path().join("widget");
        std::fs::create_dir_all(&root).unwrap();
        Fixture {
            _temp: temp,
            layout,
            root,
            id: Identity::new("acme", "widget", "main"),
        }
    }

    #[test]
    fn round_trip_restores_local() {
        let f = fixture();
        let local = local_path(&f.root);
        bank::initialize(&local).unwrap();
        write_document(&local, Document::Progress, "# Progress\n\n## Done\n\n- shipped\n").unwrap();
        let before: Vec<_> = Document::ALL
            .iter()
            .map(|d| read_document(&local, *d).unwrap())
            .collect();

        assert_eq!(sync_to_central(&f.layout, &f.root, &f.id).unwrap(), SyncOutcome::Pushed(5));
        std::fs::remove_dir_all(&local).unwrap();
        assert_eq!(sync_to_project(&f.layout, &f.root, &f.id).unwrap(), SyncOutcome::Pulled(5));

        let after: Vec<_> = Document::ALL
            .iter()
            .map(|d| read_document(&local, *d).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_local_does_not_erase_central() {
        let f = fixture();
        let central = f.layout.bank_path(&f.id);
        bank::initialize(&central).unwrap();
        std::fs::create_dir_all(local_path(&f.root)).unwrap();

        let outcome = sync_to_central(&f.layout, &f.root, &f.id).unwrap();
        assert_eq!(outcome, SyncOutcome::RestoredLocal(5));
        assert_eq!(bank::state(&central).unwrap(), BankState::Populated);
        assert_eq!(bank::state(&local_path(&f.root)).unwrap(), BankState::Populated);
    }

    #[test]
    fn nothing_on_either_side() {
        let f = fixture();
        let outcome = sync_to_central(&f.layout, &f.root, &f.id).unwrap();
        assert_eq!(outcome, SyncOutcome::NothingToSync);
        assert_eq!(central_state(&f.layout, &f.id).unwrap(), BankState::Missing);
    }

    #[test]
    fn empty_central_seeds_local_from_template() {
        let f = fixture();
        let outcome = sync_to_project(&f.layout, &f.root, &f.id).unwrap();
        assert_eq!(outcome, SyncOutcome::InitializedLocal);
        assert_eq!(bank::documents(&local_path(&f.root)).unwrap().len(), 5);
    }

    #[test]
    fn bidirectional_keeps_local_only_content() {
        let f = fixture();
        let local = local_path(&f.root);
        let central = f.layout.bank_path(&f.id);
        bank::initialize(&central).unwrap();
        bank::initialize(&local).unwrap();
        write_document(&local, Document::DecisionLog, "# Decision Log\n\n## Decisions\n\n- local\n")
            .unwrap();

        sync_bidirectional(&f.layout, &f.root, &f.id).unwrap();

        let central_doc = read_document(&central, Document::DecisionLog).unwrap().unwrap();
        let local_doc = read_document(&local, Document::DecisionLog).unwrap().unwrap();
        assert!(central_doc.contains("- local"));
        assert_eq!(central_doc, local_doc);
    }
}
