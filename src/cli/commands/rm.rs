use anyhow::Result;
use annix::{RemoveOptions, RemoveStatus};
use colored::Colorize;

use super::{name_list, sync, Context};

pub fn handle(
    context: &Context,
    packages: &[String],
    delete: bool,
    all: bool,
    skip_rebuild: bool,
) -> Result<()> {
    let annix = context.annix()?;
    let options = RemoveOptions {
        delete,
        all_instances: all,
    };
    let report = annix.remove(packages, options)?;

    if !report.changed() {
        println!(
            "{}",
            "No changes made - The specified packages were not installed".bright_magenta()
        );
        return Ok(());
    }

    let disabled = report.names_with(RemoveStatus::Disabled);
    let deleted = report.names_with(RemoveStatus::Deleted);
    let missing = report.names_with(RemoveStatus::NotFound);

    if !disabled.is_empty() {
        println!("{} {} disabled", "✓".bright_green(), name_list(&disabled));
    }
    if !deleted.is_empty() {
        println!("{} {} deleted", "✓".bright_green(), name_list(&deleted));
    }
    if !missing.is_empty() {
        println!("{} {} not found", "⚠".bright_yellow(), name_list(&missing));
    }

    if skip_rebuild || !annix.config().data.auto_sync {
        println!("Run {} to apply the changes", "annix sync".bright_cyan());
        return Ok(());
    }

    sync::run(&annix, false)
}
