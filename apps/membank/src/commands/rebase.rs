use super::Context;
use super::merge::print_report;
use anyhow::Result;
use colored::Colorize;

pub fn execute(ctx: &Context, branch: &str) -> Result<()> {
    let ws = ctx.workspace();
    let report = ws.rebase(branch)?;
    println!(
        "{} Rebased {} onto {}",
        "✓".green(),
        ws.identity.branch.cyan(),
        branch.cyan()
    );
    print_report(&report);
    Ok(())
}
