use super::Context;
use anyhow::Result;
use colored::Colorize;

pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    let ws = ctx.workspace();
    let entries = ws.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "No memory banks for {}/{}",
            ws.identity.domain, ws.identity.project
        );
        println!("Create one with {}", "membank create".cyan());
        return Ok(());
    }

    println!(
        "{} {}/{}",
        "Memory banks for".bold(),
        ws.identity.domain,
        ws.identity.project
    );
    for entry in &entries {
        let marker = if entry.current { "*".green() } else { " ".normal() };
        let name = if entry.current {
            entry.branch.green().bold()
        } else {
            entry.branch.normal()
        };
        println!("{marker} {name} ({} documents)", entry.documents);
    }
    Ok(())
}
