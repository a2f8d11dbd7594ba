use super::{Context, describe_sync};
use anyhow::Result;
use colored::Colorize;
use dialoguer::Select;
use membank_core::{BankError, Identity, NewBankChoice};
use std::io::IsTerminal;

pub fn execute(ctx: &Context, branch: Option<&str>, inherit: bool, fresh: bool) -> Result<()> {
    let ws = ctx.workspace();

    let report = ws.switch(branch, |from, to| {
        if inherit {
            return Ok(NewBankChoice::Inherit);
        }
        if fresh {
            return Ok(NewBankChoice::Initialize);
        }
        prompt(from, to)
    })?;

    println!(
        "{} Saved {}: {}",
        "✓".green(),
        report.from.branch,
        describe_sync(report.flushed)
    );
    match report.created {
        Some(NewBankChoice::Inherit) => println!(
            "{} Created {} from {}",
            "✓".green(),
            report.to.branch.cyan(),
            report.from.branch
        ),
        Some(NewBankChoice::Initialize) => println!(
            "{} Created {} from templates",
            "✓".green(),
            report.to.branch.cyan()
        ),
        None => {}
    }
    println!(
        "{} Switched to {}: {}",
        "✓".green(),
        report.to.to_string().cyan(),
        describe_sync(report.loaded)
    );
    Ok(())
}

/// Ask how to seed a new bank. Without a terminal the default (inherit) is used.
fn prompt(from: &Identity, to: &Identity) -> membank_core::Result<NewBankChoice> {
    if !std::io::stdin().is_terminal() {
        return Ok(NewBankChoice::Inherit);
    }
    let items = [
        format!("Inherit from {}", from.branch),
        "Start from templates".to_string(),
    ];
    let selection = Select::new()
        .with_prompt(format!("No memory bank for {} yet", to.branch))
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| BankError::Other(anyhow::anyhow!("Prompt failed: {e}")))?;
    Ok(if selection == 0 {
        NewBankChoice::Inherit
    } else {
        NewBankChoice::Initialize
    })
}
