use anyhow::Result;
use annix::system::NixSearch;
use colored::Colorize;

use super::Context;

pub fn handle(context: &Context, query: &[String]) -> Result<()> {
    let annix = context.annix()?;
    let searcher = NixSearch::new(annix.config().data.search_command.clone());
    let hits = annix.search(&query.join(" "), &searcher)?;

    if hits.is_empty() {
        println!("{}", "No packages found".bright_red());
        return Ok(());
    }

    for hit in hits {
        print!("\nᗌ {} @ {}", hit.attribute.bright_blue(), hit.version.bright_cyan());
        if hit.name != hit.attribute {
            print!(" ({})", hit.name);
        }
        if hit.description.is_empty() {
            println!();
        } else {
            println!(":");
            for line in hit.description.lines() {
                println!("    {}", line.trim_end());
            }
        }
    }

    Ok(())
}
