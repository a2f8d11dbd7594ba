use super::Context;
use anyhow::Result;
use colored::Colorize;
use membank_core::workspace::CreateOutcome;

pub fn execute(ctx: &Context, force: bool) -> Result<()> {
    let ws = ctx.workspace();
    match ws.create(force)? {
        CreateOutcome::Created => {
            println!(
                "{} Created memory bank for {}",
                "✓".green(),
                ws.identity.to_string().cyan()
            );
        }
        CreateOutcome::AlreadyExisted => {
            println!(
                "{} Memory bank for {} already exists; synced it instead",
                "✓".green(),
                ws.identity.to_string().cyan()
            );
            println!("  Use {} to reinitialize from templates", "--force".yellow());
        }
    }
    println!("  Local:   {}", ws.local_path().display());
    println!("  Central: {}", ws.central_path().display());
    Ok(())
}
