use anyhow::{Context as _, Result};
use annix::config::Config;
use colored::Colorize;

use crate::cli::ConfigAction;

pub fn handle(action: ConfigAction) -> Result<()> {
    let mut config = Config::load_or_default(Config::default_path()?)
        .context("Failed to load configuration")?;

    match action {
        ConfigAction::Set { key, value } => {
            println!(
                "{} Setting {} = {}",
                "→".bright_green(),
                key.bright_cyan(),
                value.bright_yellow()
            );
            config.set(&key, &value)?;
            println!(
                "{} Configuration updated in {}",
                "✓".bright_green(),
                config.path.display()
            );
        }

        ConfigAction::Get { key } => {
            println!("{} = {}", key.bright_cyan(), config.get(&key)?);
        }

        ConfigAction::List => {
            println!("{}", "Current Configuration:".bright_blue().bold());
            println!("  {} {}", "ℹ".bright_blue(), config.path.display());
            for (key, value) in config.entries() {
                println!("  {} = {}", key.bright_cyan(), value.bright_yellow());
            }
        }
    }

    Ok(())
}
