use anyhow::Result;
use colored::Colorize;

use super::Context;

pub fn handle(context: &Context) -> Result<()> {
    let annix = context.annix()?.quiet(true);
    let removed = annix.clean()?;

    if removed == 0 {
        println!("{} No disabled packages to remove", "ℹ".bright_blue());
    } else {
        println!(
            "{} Removed {} disabled {}",
            "✓".bright_green(),
            removed,
            if removed == 1 { "entry" } else { "entries" }
        );
    }

    Ok(())
}
