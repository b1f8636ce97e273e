use anyhow::Result;
use annix::SyncState;
use colored::Colorize;

use super::Context;

pub fn handle(context: &Context) -> Result<()> {
    let annix = context.annix()?;
    let status = annix.status()?;

    println!("{}", "annix status".bright_blue().bold());
    println!("{}", "============".bright_blue());
    println!("  {} File: {}", "•".bright_cyan(), status.path.display());

    match status.state {
        SyncState::Synced => println!("  {} System matches the file", "✓".bright_green()),
        SyncState::Stale => println!(
            "  {} System is out of date, run {}",
            "⚠".bright_yellow(),
            "annix sync".bright_cyan()
        ),
    }

    println!(
        "  {} Stored hash:   {}",
        "•".bright_cyan(),
        status.integrity.stored.as_deref().unwrap_or("(none)").bright_black()
    );
    println!(
        "  {} Computed hash: {}",
        "•".bright_cyan(),
        status.integrity.computed.bright_black()
    );
    println!(
        "  {} {} active, {} disabled, {} code lines",
        "•".bright_cyan(),
        status.active,
        status.disabled,
        status.code_lines
    );

    Ok(())
}
