use anyhow::Result;
use annix::AddStatus;
use colored::Colorize;

use super::{name_list, sync, Context};

pub fn handle(context: &Context, packages: &[String], skip_rebuild: bool) -> Result<()> {
    let annix = context.annix()?;
    let report = annix.add(packages)?;

    let added = report.names_with(AddStatus::Added);
    let reactivated = report.names_with(AddStatus::Reactivated);
    let existing = report.names_with(AddStatus::AlreadyActive);

    if !report.changed() {
        println!(
            "{}",
            "No changes made - The specified packages were already installed".bright_magenta()
        );
        return Ok(());
    }

    if !added.is_empty() {
        println!("{} {} added", "✓".bright_green(), name_list(&added));
    }
    if !reactivated.is_empty() {
        println!("{} {} re-enabled", "✓".bright_green(), name_list(&reactivated));
    }
    if !existing.is_empty() {
        println!("{} {} unchanged - already installed", "ℹ".bright_blue(), name_list(&existing));
    }

    if skip_rebuild || !annix.config().data.auto_sync {
        println!("Run {} to apply the changes", "annix sync".bright_cyan());
        return Ok(());
    }

    sync::run(&annix, false)
}
