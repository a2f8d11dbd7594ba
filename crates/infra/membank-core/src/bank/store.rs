//! Filesystem operations on a single bank directory.
//!
//! A bank is a directory of markdown documents. Functions here do not know
//! whether the directory is a central or a project-local bank.

use super::template::Document;
use crate::error::{BankError, Result};
use crate::utils::timestamp;
use atomicwrites::{AllowOverwrite, AtomicFile};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Observable state of a bank location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BankState {
    Missing,
    /// Directory exists but holds no documents; recoverable by re-sync.
    Empty,
    Populated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(usize),
    SourceEmpty,
}

fn is_document(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|e| e == "md")
}

/// Markdown documents in `dir`, sorted by name. A missing directory has none.
pub fn documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut docs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_document(&path) {
            docs.push(path);
        }
    }
    docs.sort();
    Ok(docs)
}

pub fn state(dir: &Path) -> Result<BankState> {
    if !dir.is_dir() {
        return Ok(BankState::Missing);
    }
    if documents(dir)?.is_empty() {
        Ok(BankState::Empty)
    } else {
        Ok(BankState::Populated)
    }
}

pub fn document_path(dir: &Path, doc: Document) -> PathBuf {
    dir.join(doc.file_name())
}

/// Create `dir` and write every document from its template.
///
/// Existing documents are overwritten; callers check [`state`] first where
/// that matters.
pub fn initialize(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let ts = timestamp();
    for doc in Document::ALL {
        write_document(dir, doc, &doc.template().render(&ts))?;
    }
    info!("Initialized memory bank at {}", dir.display());
    Ok(())
}

/// Replace every document at `dst` with the documents at `src`.
///
/// An absent or empty `src` leaves `dst` untouched.
pub fn copy_all(src: &Path, dst: &Path) -> Result<CopyOutcome> {
    let sources = documents(src)?;
    if sources.is_empty() {
        debug!("Copy source {} has no documents", src.display());
        return Ok(CopyOutcome::SourceEmpty);
    }

    fs::create_dir_all(dst)?;
    for stale in documents(dst)? {
        fs::remove_file(&stale)?;
    }
    for path in &sources {
        let Some(name) = path.file_name() else {
            continue;
        };
        fs::copy(path, dst.join(name))?;
    }
    debug!(
        "Copied {} documents {} -> {}",
        sources.len(),
        src.display(),
        dst.display()
    );
    Ok(CopyOutcome::Copied(sources.len()))
}

pub fn read_document(dir: &Path, doc: Document) -> Result<Option<String>> {
    let path = document_path(dir, doc);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}

/// Overwrite a document atomically.
pub fn write_document(dir: &Path, doc: Document, content: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = document_path(dir, doc);
    AtomicFile::new(&path, AllowOverwrite)
        .write(|f| f.write_all(content.as_bytes()))
        .map_err(|e| BankError::Io(std::io::Error::other(e)))?;
    Ok(())
}

/// Append a `## heading` section, creating the document from its template first if absent.
pub fn append_section(dir: &Path, doc: Document, heading: &str, body: &str) -> Result<()> {
    let mut content = match read_document(dir, doc)? {
        Some(existing) => existing,
        None => doc.template().render(&timestamp()),
    };
    push_block(&mut content, &format!("## {heading}\n\n{}", body.trim_end()));
    write_document(dir, doc, &content)?;
    debug!("Appended '{}' to {} in {}", heading, doc, dir.display());
    Ok(())
}

/// Append `block` after a blank line, keeping a trailing newline.
pub(crate) fn push_block(content: &mut String, block: &str) {
    if !content.is_empty() {
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');
    }
    content.push_str(block);
    if !content.ends_with('\n') {
        content.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn initialize_writes_all_documents() {
        let temp = TempDir::new().unwrap();
        let bank = temp.path().join("bank");
        initialize(&bank).unwrap();

        assert_eq!(state(&bank).unwrap(), BankState::Populated);
        assert_eq!(documents(&bank).unwrap().len(), 5);
        let active = read_document(&bank, Document::ActiveContext).unwrap().unwrap();
        assert!(active.starts_with("# Active Context\n\n*Initialized: "));
        assert!(active.contains("## Current Focus"));
    }

    #[test]
    fn states() {
        let temp = TempDir::new().unwrap();
        let bank = temp.path().join("bank");
        assert_eq!(state(&bank).unwrap(), BankState::Missing);
        fs::create_dir_all(&bank).unwrap();
        fs::write(bank.join("notes.txt"), "not a document").unwrap();
        assert_eq!(state(&bank).unwrap(), BankState::Empty);
        fs::write(bank.join("extra.md"), "# Extra").unwrap();
        assert_eq!(state(&bank).unwrap(), BankState::Populated);
    }

    #[test]
    fn copy_all_replaces_documents() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        initialize(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("stale.md"), "old").unwrap();
        fs::write(dst.join("keep.txt"), "not a document").unwrap();

        assert_eq!(copy_all(&src, &dst).unwrap(), CopyOutcome::Copied(5));
        assert!(!dst.join("stale.md").exists());
        assert!(dst.join("keep.txt").exists());
        for doc in Document::ALL {
            assert_eq!(
                read_document(&src, doc).unwrap(),
                read_document(&dst, doc).unwrap()
            );
        }
    }

    #[test]
    fn copy_all_from_empty_source_leaves_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        initialize(&dst).unwrap();

        assert_eq!(copy_all(&src, &dst).unwrap(), CopyOutcome::SourceEmpty);
        assert_eq!(copy_all(&temp.path().join("nope"), &dst).unwrap(), CopyOutcome::SourceEmpty);
        assert_eq!(documents(&dst).unwrap().len(), 5);
    }

    #[test]
    fn append_section_to_existing() {
        let temp = TempDir::new().unwrap();
        write_document(temp.path(), Document::Progress, "# Progress\n\n## Done\n\n- a").unwrap();
        append_section(temp.path(), Document::Progress, "Later", "- b\n\n").unwrap();

        let content = read_document(temp.path(), Document::Progress).unwrap().unwrap();
        assert_eq!(content, "# Progress\n\n## Done\n\n- a\n\n## Later\n\n- b\n");
    }

    #[test]
    fn append_section_creates_from_template() {
        let temp = TempDir::new().unwrap();
        append_section(temp.path(), Document::ActiveContext, "Note", "- hello").unwrap();

        let content = read_document(temp.path(), Document::ActiveContext).unwrap().unwrap();
        assert!(content.starts_with("# Active Context"));
        assert!(content.ends_with("## Note\n\n- hello\n"));
    }
}
