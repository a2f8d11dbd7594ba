use super::Context;
use anyhow::Result;
use colored::Colorize;

pub fn execute(ctx: &Context, branch: Option<&str>) -> Result<()> {
    let ws = ctx.workspace();
    let today = chrono::Local::now().date_naive();
    let dest = ws.archive(branch, today)?;
    println!(
        "{} Archived {} to {}",
        "✓".green(),
        branch.unwrap_or(&ws.identity.branch).cyan(),
        dest.display()
    );
    Ok(())
}
