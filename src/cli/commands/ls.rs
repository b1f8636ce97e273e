use anyhow::Result;
use colored::Colorize;

use super::Context;

pub fn handle(context: &Context, json: bool) -> Result<()> {
    let annix = context.annix()?;
    let doc = annix.load()?;
    let active = doc.active_entries();
    let disabled = doc.disabled_entries();

    if json {
        let out = serde_json::json!({ "active": active, "disabled": disabled });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if active.is_empty() && disabled.is_empty() {
        println!("No packages found in {}", annix.path().display().to_string().bright_yellow());
        return Ok(());
    }

    if active.is_empty() {
        println!("\nNo {} packages", "active".bright_green());
    } else {
        println!("\n{} packages:", "Active".bright_green());
        for entry in &active {
            println!("    {}", entry.name);
        }
    }

    if disabled.is_empty() {
        println!("\nNo {} packages", "disabled".bright_magenta());
    } else {
        println!("\n{} packages:", "Disabled".bright_magenta());
        for entry in &disabled {
            println!("    {}", entry.name);
        }
    }

    Ok(())
}
