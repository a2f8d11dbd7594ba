use super::{Context, check_mark};
use anyhow::Result;
use colored::Colorize;
use membank_core::utils::gitignore::{GLOBAL_ENTRY, GitignoreStatus, PROJECT_ENTRY};

pub fn check(ctx: &Context) -> Result<()> {
    let status = ctx.workspace().gitignore_status()?;
    print_status(&status);
    if !status.is_ok() {
        println!("Run {} to add the missing entries", "membank fix-gitignore".cyan());
    }
    Ok(())
}

pub fn fix(ctx: &Context) -> Result<()> {
    let status = ctx.workspace().fix_gitignore()?;
    print_status(&status);
    Ok(())
}

fn print_status(status: &GitignoreStatus) {
    println!(
        "{} {} in {}",
        check_mark(status.project_ok),
        PROJECT_ENTRY,
        status.project_file.display()
    );
    match &status.global_file {
        Some(path) => println!(
            "{} {} in {}",
            check_mark(status.global_ok),
            GLOBAL_ENTRY,
            path.display()
        ),
        None => println!("{} no global gitignore configured", check_mark(false)),
    }
}
