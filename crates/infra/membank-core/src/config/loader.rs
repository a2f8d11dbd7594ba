//! Configuration loading with env overrides.
//!
//! The loading process:
//! 1. Read `~/.config/membank/config.json` (or an explicit path)
//! 2. Deserialize into [`BankConfig`], defaults filling missing fields
//! 3. Apply `MEMBANK_*` env var overrides (highest precedence)
//! 4. Expand `~` in every path

use super::types::BankConfig;
use crate::error::{BankError, Result};
use anyhow::Context;
use atomicwrites::{AllowOverwrite, AtomicFile};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name under config_dir.
pub const CONFIG_DIR: &str = "membank";

/// Config filename.
pub const CONFIG_FILE: &str = "config.json";

/// Result of loading configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Effective configuration with `~` expanded.
    pub config: BankConfig,

    /// Where the config file was looked up.
    pub path: PathBuf,

    /// Whether the file existed.
    pub from_file: bool,
}

/// Get the default config file path (`~/.config/membank/config.json` on Linux).
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config dir")?;
    Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load configuration from `path` (or the default location) and the process environment.
pub fn load(path: Option<&Path>) -> Result<LoadedConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    load_with_env(&path, |name| std::env::var(name).ok())
}

/// Load configuration using `env` as the variable lookup.
pub fn load_with_env<F>(path: &Path, env: F) -> Result<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let from_file = path.exists();
    let mut cfg = if from_file {
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str::<BankConfig>(&raw).map_err(|e| {
            BankError::Other(anyhow::anyhow!("Invalid config in {}: {}", path.display(), e))
        })?
    } else {
        BankConfig::default()
    };

    apply_env_overrides(&mut cfg, env);

    Ok(LoadedConfig {
        config: cfg.expanded()?,
        path: path.to_path_buf(),
        from_file,
    })
}

/// Write `cfg` to `path` atomically, creating parent directories.
pub fn save(path: &Path, cfg: &BankConfig) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(cfg)?;
    AtomicFile::new(path, AllowOverwrite)
        .write(|f| f.write_all(json.as_bytes()))
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

fn apply_env_overrides<F>(cfg: &mut BankConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        env(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    if let Some(v) = get("MEMBANK_CENTRAL_ROOT") {
        cfg.central_root = v;
    }
    if let Some(v) = get("MEMBANK_DOMAINS_ROOT") {
        cfg.domains_root = v;
    }
    if let Some(v) = get("MEMBANK_LEGACY_ROOT") {
        cfg.legacy_root = v;
    }
    if let Some(v) = get("MEMBANK_HOOKS_DIR") {
        cfg.hooks_dir = v;
    }
    if let Some(v) = get("MEMBANK_GLOBAL_GITIGNORE") {
        cfg.global_gitignore = Some(v);
    }
}
