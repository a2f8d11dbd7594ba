use super::Context;
use anyhow::Result;
use membank_core::{HookKind, run_hook};
use std::path::Path;
use tracing::{info, warn};

/// Run a git hook. Only an unknown hook name fails; bank problems are logged.
pub fn execute(config: Option<&Path>, name: &str, args: &[String]) -> Result<()> {
    let kind: HookKind = name.parse()?;

    let ctx = match Context::load(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("membank {kind} hook skipped: {e:#}");
            return Ok(());
        }
    };
    let ws = ctx.workspace();
    let report = run_hook(&ws, &ctx.oracle, kind, args);

    match &report.error {
        Some(e) => eprintln!("membank: {kind} hook for {} did not complete: {e}", ws.identity),
        None => info!("{} hook for {}: {} steps", kind, ws.identity, report.steps.len()),
    }
    Ok(())
}
