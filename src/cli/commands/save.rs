use anyhow::{Context as _, Result};
use annix::AnnixError;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use super::Context;

pub fn handle(context: &Context, name: Option<String>, force: bool) -> Result<()> {
    let annix = context.annix()?;
    let label = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d-%H%M%S").to_string());

    let saved = match annix.save(&label, force) {
        Ok(path) => path,
        Err(AnnixError::AlreadyExists { path }) => {
            if !confirm(&format!("'{}' already exists, overwrite?", path.display()))? {
                println!("{}", "Nothing saved".bright_magenta());
                return Ok(());
            }
            annix.save(&label, true)?
        }
        Err(err) => return Err(err.into()),
    };

    println!("{} Configuration saved as {}", "✓".bright_green(), saved.display());
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
