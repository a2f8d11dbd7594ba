use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::utils::paths::expand_path;

/// Storage and hook locations for memory banks.
///
/// Every field has a default so partial config files work. Paths may start
/// with `~/`; call [`BankConfig::expanded`] before handing them to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Root of all central banks (`<root>/<domain>/<project>/<branch>`).
    pub central_root: PathBuf,

    /// Projects under `<domains_root>/<domain>/...` take their domain from the first segment.
    pub domains_root: PathBuf,

    /// Older flat layout: `<legacy_root>/<domain>/<project>`.
    pub legacy_root: PathBuf,

    /// User-wide git hooks directory the hook shims live in.
    pub hooks_dir: PathBuf,

    /// Global gitignore. When unset, git's `core.excludesFile` is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_gitignore: Option<PathBuf>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            central_root: PathBuf::from("~/.membank/banks"),
            domains_root: PathBuf::from("~/code/domains"),
            legacy_root: PathBuf::from("~/code"),
            hooks_dir: PathBuf::from("~/.membank/hooks"),
            global_gitignore: None,
        }
    }
}

impl BankConfig {
    /// Returns a copy with `~` expanded in every path.
    pub fn expanded(&self) -> Result<Self> {
        Ok(Self {
            central_root: expand_path(&self.central_root)?,
            domains_root: expand_path(&self.domains_root)?,
            legacy_root: expand_path(&self.legacy_root)?,
            hooks_dir: expand_path(&self.hooks_dir)?,
            global_gitignore: self
                .global_gitignore
                .as_deref()
                .map(expand_path)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: BankConfig = serde_json::from_str(r#"{"central_root": "/srv/banks"}"#).unwrap();
        assert_eq!(cfg.central_root, PathBuf::from("/srv/banks"));
        assert_eq!(cfg.domains_root, PathBuf::from("~/code/domains"));
        assert!(cfg.global_gitignore.is_none());
    }

    #[test]
    fn expanded_resolves_home() {
        let home = dirs::home_dir().unwrap();
        let cfg = BankConfig::default().expanded().unwrap();
        assert_eq!(cfg.central_root, home.join(".membank/banks"));
        assert_eq!(cfg.legacy_root, home.join("code"));
    }
}
