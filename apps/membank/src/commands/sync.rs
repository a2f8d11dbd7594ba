use super::{Context, describe_sync};
use anyhow::Result;
use colored::Colorize;

pub fn execute(ctx: &Context) -> Result<()> {
    let ws = ctx.workspace();
    let (pushed, pulled) = ws.sync()?;
    println!("{} Synced {}", "✓".green(), ws.identity.to_string().cyan());
    println!("  Push: {}", describe_sync(pushed));
    println!("  Pull: {}", describe_sync(pulled));
    Ok(())
}
