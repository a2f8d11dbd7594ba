use anyhow::{Result, bail};
use colored::Colorize;
use membank_core::BankConfig;
use membank_core::config::{self, default_config_path};
use std::path::Path;

pub fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if path.exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    config::save(&path, &BankConfig::default())?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

pub fn show(path: Option<&Path>, json: bool) -> Result<()> {
    let loaded = config::load(path)?;
    let cfg = &loaded.config;

    if json {
        println!("{}", serde_json::to_string_pretty(cfg)?);
        return Ok(());
    }

    let source = if loaded.from_file {
        loaded.path.display().to_string()
    } else {
        format!("{} (not present, using defaults)", loaded.path.display())
    };
    println!("{} {}", "Config:".bold(), source);
    println!("  central_root:     {}", cfg.central_root.display());
    println!("  domains_root:     {}", cfg.domains_root.display());
    println!("  legacy_root:      {}", cfg.legacy_root.display());
    println!("  hooks_dir:        {}", cfg.hooks_dir.display());
    match &cfg.global_gitignore {
        Some(p) => println!("  global_gitignore: {}", p.display()),
        None => println!("  global_gitignore: {}", "(git core.excludesFile)".dimmed()),
    }
    Ok(())
}
