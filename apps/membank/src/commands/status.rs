use super::{Context, check_mark, state_label};
use anyhow::Result;
use colored::Colorize;

pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    let ws = ctx.workspace();
    let report = ws.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Memory Bank Status".bold().cyan());
    println!("{}", "==================".cyan());
    println!();

    println!("{}", "Identity:".bold());
    println!("  Domain:  {}", report.identity.domain);
    println!("  Project: {}", report.identity.project);
    println!("  Branch:  {}", report.identity.branch.cyan());
    println!("  Root:    {}", report.root.display());
    if !ctx.oracle.is_repo() {
        println!("  {}", "(not a git repository)".dimmed());
    }
    println!();

    println!("{}", "Banks:".bold());
    println!(
        "  Local:   {} ({})",
        state_label(report.local_state),
        report.local_path.display()
    );
    println!(
        "  Central: {} ({})",
        state_label(report.central_state),
        report.central_path.display()
    );
    println!();

    println!("{}", "Gitignore:".bold());
    println!(
        "  {} {}",
        check_mark(report.gitignore.project_ok),
        report.gitignore.project_file.display()
    );
    match &report.gitignore.global_file {
        Some(path) => println!(
            "  {} {}",
            check_mark(report.gitignore.global_ok),
            path.display()
        ),
        None => println!("  {} global gitignore not configured", check_mark(false)),
    }
    println!();

    println!("{} ({})", "Hooks:".bold(), report.hooks_dir.display());
    for hook in &report.hooks {
        println!("  {} {}", check_mark(hook.installed), hook.name);
    }

    if !report.gitignore.is_ok() {
        println!();
        println!("Run {} to add the missing entries", "membank fix-gitignore".cyan());
    }
    Ok(())
}
