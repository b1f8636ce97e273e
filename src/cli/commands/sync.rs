use anyhow::Result;
use annix::error::ApplyError;
use annix::system::{CommandRebuilder, Rebuilder};
use annix::Annix;
use colored::Colorize;

use super::Context;

/// Prints a banner before handing over to the real rebuild
struct Announced<R>(R);

impl<R: Rebuilder> Rebuilder for Announced<R> {
    fn apply(&self, content: &str) -> Result<(), ApplyError> {
        println!("{}", "Rebuilding system...".bright_yellow());
        self.0.apply(content)
    }
}

pub fn handle(context: &Context, force: bool) -> Result<()> {
    let annix = context.annix()?;
    run(&annix, force)
}

pub fn run(annix: &Annix, force: bool) -> Result<()> {
    let rebuilder = Announced(CommandRebuilder::new(
        annix.config().data.rebuild_command.clone(),
    ));

    let outcome = annix.sync(force, &rebuilder)?;
    if outcome.applied {
        println!("{} System rebuilt", "✓".bright_green());
    } else {
        println!("{}", "System up-to-date".bright_green());
    }

    Ok(())
}
