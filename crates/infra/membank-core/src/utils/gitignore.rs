use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Entry the project `.gitignore` must carry.
pub const PROJECT_ENTRY: &str = "/memory-bank";

/// Entry the global gitignore must carry.
pub const GLOBAL_ENTRY: &str = "memory-bank/";

const COMMENT: &str = "Branch-local memory bank (managed by membank)";

/// Whether the two gitignore files exclude the local bank.
#[derive(Debug, Clone, Serialize)]
pub struct GitignoreStatus {
    pub project_file: PathBuf,
    pub project_ok: bool,
    pub global_file: Option<PathBuf>,
    pub global_ok: bool,
}

impl GitignoreStatus {
    pub fn is_ok(&self) -> bool {
        self.project_ok && self.global_ok
    }
}

/// True when `content` already ignores `entry`, with or without leading/trailing slash.
fn has_entry(content: &str, entry: &str) -> bool {
    let bare = entry.trim_matches('/');
    content.lines().any(|line| {
        let trimmed = line.trim();
        trimmed == entry
            || trimmed == bare
            || trimmed == format!("/{bare}")
            || trimmed == format!("{bare}/")
            || trimmed == format!("/{bare}/")
    })
}

/// Check whether the gitignore file at `path` ignores `entry`
pub fn file_has_entry(path: &Path, entry: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    Ok(has_entry(&fs::read_to_string(path)?, entry))
}

/// Ensures a gitignore entry exists in the given file, creating it if needed.
///
/// Returns `true` when the file was modified.
pub fn ensure_gitignore_entry(path: &Path, entry: &str, comment: Option<&str>) -> Result<bool> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        if has_entry(&content, entry) {
            return Ok(false);
        }

        let mut new_content = content;
        if !new_content.is_empty() && !new_content.ends_with('\n') {
            new_content.push('\n');
        }
        if let Some(comment_text) = comment {
            if !new_content.is_empty() {
                new_content.push('\n');
            }
            new_content.push_str(&format!("# {comment_text}\n"));
        }
        new_content.push_str(entry);
        new_content.push('\n');

        fs::write(path, new_content)?;
        info!("Added {} to {}", entry, path.display());
    } else {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = String::new();
        if let Some(comment_text) = comment {
            content.push_str(&format!("# {comment_text}\n"));
        }
        content.push_str(&format!("{entry}\n"));

        fs::write(path, content)?;
        info!("Created {} with {} entry", path.display(), entry);
    }
    Ok(true)
}

/// Report gitignore coverage for a project root and optional global file.
pub fn check(root: &Path, global: Option<&Path>) -> Result<GitignoreStatus> {
    let project_file = root.join(".gitignore");
    let project_ok = file_has_entry(&project_file, PROJECT_ENTRY)?;
    let global_ok = match global {
        Some(g) => file_has_entry(g, GLOBAL_ENTRY)?,
        None => false,
    };
    Ok(GitignoreStatus {
        project_file,
        project_ok,
        global_file: global.map(Path::to_path_buf),
        global_ok,
    })
}

/// Idempotently add the project and global entries. Returns the resulting status.
pub fn fix(root: &Path, global: Option<&Path>) -> Result<GitignoreStatus> {
    ensure_gitignore_entry(&root.join(".gitignore"), PROJECT_ENTRY, Some(COMMENT))?;
    if let Some(g) = global {
        ensure_gitignore_entry(g, GLOBAL_ENTRY, Some(COMMENT))?;
    }
    check(root, global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_gitignore() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".gitignore");
        assert!(ensure_gitignore_entry(&path, PROJECT_ENTRY, None).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "/memory-bank\n");
    }

    #[test]
    fn appends_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".gitignore");
        fs::write(&path, "target").unwrap();

        assert!(ensure_gitignore_entry(&path, PROJECT_ENTRY, Some("bank")).unwrap());
        assert!(!ensure_gitignore_entry(&path, PROJECT_ENTRY, Some("bank")).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "target\n\n# bank\n/memory-bank\n");
    }

    #[test]
    fn recognizes_slash_variants() {
        assert!(has_entry("memory-bank/\n", PROJECT_ENTRY));
        assert!(has_entry("/memory-bank\n", GLOBAL_ENTRY));
        assert!(!has_entry("memory-bank-old\n", GLOBAL_ENTRY));
    }

    #[test]
    fn fix_covers_both_files() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global").join("ignore");
        let before = check(temp.path(), Some(&global)).unwrap();
        assert!(!before.is_ok());

        let after = fix(temp.path(), Some(&global)).unwrap();
        assert!(after.project_ok);
        assert!(after.global_ok);
        assert!(fs::read_to_string(&global).unwrap().contains("memory-bank/"));
    }

    #[test]
    fn no_global_file_is_reported_missing() {
        let temp = TempDir::new().unwrap();
        let status = fix(temp.path(), None).unwrap();
        assert!(status.project_ok);
        assert!(!status.global_ok);
    }
}
