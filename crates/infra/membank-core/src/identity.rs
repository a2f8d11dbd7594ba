//! Project identity and storage locations.
//!
//! An [`Identity`] is recomputed from the project path and git state on every
//! invocation and never stored. [`Layout`] turns identities into the central
//! bank paths; [`local_path`] gives the per-project working copy.

use crate::config::BankConfig;
use crate::git::GitOracle;
use crate::utils::paths::sanitize_dir_name;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Directory name of the project-local bank.
pub const LOCAL_BANK_DIR: &str = "memory-bank";

/// Branch used outside git, on a detached HEAD, or before the first commit.
pub const NO_BRANCH: &str = "default";

/// Domain for projects living in temporary filesystem locations.
pub const TEMP_DOMAIN: &str = "temp";

/// Domain when nothing better can be derived.
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Subdirectory of a project's central path holding archived banks.
pub const ARCHIVE_DIR: &str = "archive";

/// Files whose presence marks a project root outside git.
const PROJECT_MARKERS: &[&str] = &[
    ".git",
    ".membank-root",
    "Cargo.toml",
    "package.json",
    "pyproject.toml",
    "go.mod",
];

const TEMP_PREFIXES: &[&str] = &[
    "/tmp",
    "/var/tmp",
    "/var/folders",
    "/private/tmp",
    "/private/var/folders",
    "/dev/shm",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    pub domain: String,
    pub project: String,
    pub branch: String,
}

impl Identity {
    pub fn new(
        domain: impl Into<String>,
        project: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            project: project.into(),
            branch: branch.into(),
        }
    }

    /// Same project, different branch.
    pub fn with_branch(&self, branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.domain, self.project, self.branch)
    }
}

/// Where central banks live and how domains are recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub central_root: PathBuf,
    pub domains_root: PathBuf,
    pub legacy_root: PathBuf,
}

impl Layout {
    /// Build from an already expanded config.
    pub fn from_config(config: &BankConfig) -> Self {
        Self {
            central_root: config.central_root.clone(),
            domains_root: config.domains_root.clone(),
            legacy_root: config.legacy_root.clone(),
        }
    }

    /// `<central>/<domain>/<project>[/<branch>]`. Without a branch this is the
    /// directory holding every branch of the project.
    pub fn central_path(&self, domain: &str, project: &str, branch: Option<&str>) -> PathBuf {
        let project_dir = self.central_root.join(domain).join(project);
        match branch {
            Some(b) => project_dir.join(branch_dir_name(b)),
            None => project_dir,
        }
    }

    /// Central bank directory for an identity.
    pub fn bank_path(&self, identity: &Identity) -> PathBuf {
        self.central_path(&identity.domain, &identity.project, Some(&identity.branch))
    }

    /// Directory holding all branches of the identity's project.
    pub fn project_path(&self, identity: &Identity) -> PathBuf {
        self.central_path(&identity.domain, &identity.project, None)
    }

    /// `<project>/archive/<branch>-<date>`; collision handling is left to the caller.
    pub fn archive_path(&self, identity: &Identity, date: NaiveDate) -> PathBuf {
        self.project_path(identity).join(ARCHIVE_DIR).join(format!(
            "{}-{}",
            branch_dir_name(&identity.branch),
            date.format("%Y-%m-%d")
        ))
    }
}

/// Directory name for a branch's central bank.
///
/// Path separators are flattened, and a branch named like the archive
/// directory gets a trailing `_` so it cannot shadow the archive.
pub fn branch_dir_name(branch: &str) -> String {
    let name = sanitize_dir_name(branch);
    if name == ARCHIVE_DIR {
        format!("{name}_")
    } else {
        name
    }
}

/// Project-local bank directory.
pub fn local_path(root: &Path) -> PathBuf {
    root.join(LOCAL_BANK_DIR)
}

/// Git top-level, else the nearest ancestor with a project marker, else `start`.
pub fn resolve_root(start: &Path, oracle: &dyn GitOracle) -> PathBuf {
    if let Some(top) = oracle.toplevel() {
        debug!("Project root from git: {}", top.display());
        return top;
    }
    for dir in start.ancestors() {
        if let Some(marker) = PROJECT_MARKERS.iter().find(|m| dir.join(m).exists()) {
            debug!("Project root from marker {}: {}", marker, dir.display());
            return dir.to_path_buf();
        }
    }
    debug!("No project root found, using {}", start.display());
    start.to_path_buf()
}

/// First path segment after `prefix`, when at least a project segment follows it.
fn domain_under(root: &Path, prefix: &Path) -> Option<String> {
    let rest = root.strip_prefix(prefix).ok()?;
    let mut parts = rest.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().to_string()),
        _ => None,
    });
    let domain = parts.next()?;
    parts.next()?;
    Some(domain)
}

fn is_temp_location(root: &Path) -> bool {
    if TEMP_PREFIXES.iter().any(|p| root.starts_with(p)) {
        return true;
    }
    let tmp = std::env::temp_dir();
    if root.starts_with(&tmp) {
        return true;
    }
    std::fs::canonicalize(&tmp).is_ok_and(|t| root.starts_with(t))
}

/// Derive the domain (top-level grouping directory) of a project root.
pub fn resolve_domain(root: &Path, layout: &Layout) -> String {
    if let Some(domain) = domain_under(root, &layout.domains_root) {
        return domain;
    }
    if let Some(domain) = domain_under(root, &layout.legacy_root)
        && layout
            .domains_root
            .file_name()
            .is_none_or(|d| d.to_string_lossy() != domain)
    {
        return domain;
    }
    if is_temp_location(root) {
        return TEMP_DOMAIN.to_string();
    }

    let parent = root
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().to_string());
    match parent {
        Some(name) if name.chars().count() > 1 => name,
        _ => UNKNOWN_DOMAIN.to_string(),
    }
}

/// Basename of the project root.
pub fn resolve_project(root: &Path) -> String {
    root.file_name()
        .map_or_else(|| UNKNOWN_DOMAIN.to_string(), |n| n.to_string_lossy().to_string())
}

/// Current branch, or [`NO_BRANCH`].
pub fn resolve_branch(oracle: &dyn GitOracle) -> String {
    oracle
        .current_branch()
        .unwrap_or_else(|| NO_BRANCH.to_string())
}

pub fn resolve_identity(root: &Path, layout: &Layout, oracle: &dyn GitOracle) -> Identity {
    Identity::new(
        resolve_domain(root, layout),
        resolve_project(root),
        resolve_branch(oracle),
    )
}
