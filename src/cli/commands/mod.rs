pub mod add;
pub mod clean;
pub mod config;
pub mod ls;
pub mod rm;
pub mod save;
pub mod search;
pub mod status;
pub mod sync;

use anyhow::{Context as _, Result};
use annix::config::Config;
use annix::error::{AnnixError, ApplyError};
use annix::Annix;
use colored::Colorize;
use std::path::PathBuf;

/// Settings shared by every command
pub struct Context {
    file: Option<PathBuf>,
    quiet: bool,
}

impl Context {
    pub fn new(file: Option<PathBuf>, quiet: bool) -> Self {
        Self { file, quiet }
    }

    pub fn annix(&self) -> Result<Annix> {
        let mut config = Config::load().context("Failed to load configuration")?;
        if let Some(file) = &self.file {
            config.data.file = file.clone();
        }
        Ok(Annix::new(config).quiet(self.quiet))
    }
}

/// Display an error message with proper formatting
pub fn display_error(err: &anyhow::Error) {
    eprintln!("\n{} {}", "✗".bright_red().bold(), "Operation failed".bright_red().bold());
    eprintln!("  {} {}", "├".bright_black(), err);

    // Display error chain
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "├".bright_black(), cause);
    }

    // Add helpful context based on error type
    match err.downcast_ref::<AnnixError>() {
        Some(AnnixError::Io(e)) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("  {} Try running with elevated permissions", "└".bright_cyan());
        }
        Some(AnnixError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!(
                "  {} Check the file path, or set it with {}",
                "└".bright_cyan(),
                "annix config set file <path>".bright_yellow()
            );
        }
        Some(AnnixError::Parse(_)) => {
            eprintln!(
                "  {} Keep a single {} and a single {} / {} marker",
                "└".bright_cyan(),
                "#@#".bright_yellow(),
                "#@+".bright_yellow(),
                "#@+^".bright_yellow()
            );
        }
        Some(AnnixError::Apply(ApplyError::Failed { .. })) => {
            eprintln!(
                "  {} Your edits are saved; the system still differs from the file",
                "└".bright_cyan()
            );
            eprintln!("    Fix the problem and run: {}", "annix sync".bright_yellow());
        }
        _ => {
            eprintln!(
                "  {} Run with {} for more details",
                "└".bright_black(),
                "--verbose".bright_cyan()
            );
        }
    }
}

/// `{ a, b, c }` with highlighted names
pub(crate) fn name_list(names: &[&str]) -> String {
    let names: Vec<String> = names.iter().map(|n| n.bright_blue().to_string()).collect();
    format!("{{ {} }}", names.join(", "))
}
