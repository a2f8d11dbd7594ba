use super::Context;
use anyhow::Result;
use colored::Colorize;
use membank_core::lineage::MergeReport;

pub fn execute(ctx: &Context, branch: &str) -> Result<()> {
    let ws = ctx.workspace();
    let report = ws.merge(branch)?;
    println!(
        "{} Merged {} into {}",
        "✓".green(),
        branch.cyan(),
        ws.identity.branch.cyan()
    );
    print_report(&report);
    Ok(())
}

pub fn print_report(report: &MergeReport) {
    for doc in &report.appended {
        println!("  appended to {doc}");
    }
    for doc in &report.copied {
        println!("  copied {doc}");
    }
}
