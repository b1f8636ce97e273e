mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = cli::Cli::parse();

    // -v wins over RUST_LOG; otherwise RUST_LOG applies, with warn as fallback
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Run the command and handle errors gracefully
    if let Err(err) = run_command(cli) {
        commands::display_error(&err);
        std::process::exit(1);
    }
}

fn run_command(cli: cli::Cli) -> Result<()> {
    use cli::Commands;

    let context = commands::Context::new(cli.file, cli.quiet);

    match cli.command {
        None => commands::sync::handle(&context, cli.force),
        Some(Commands::Sync { force }) => commands::sync::handle(&context, force),
        Some(Commands::Search { query }) => commands::search::handle(&context, &query),
        Some(Commands::Add {
            packages,
            skip_rebuild,
        }) => commands::add::handle(&context, &packages, skip_rebuild),
        Some(Commands::Rm {
            packages,
            delete,
            all,
            skip_rebuild,
        }) => commands::rm::handle(&context, &packages, delete, all, skip_rebuild),
        Some(Commands::Ls { json }) => commands::ls::handle(&context, json),
        Some(Commands::Clean) => commands::clean::handle(&context),
        Some(Commands::Save { name, force }) => commands::save::handle(&context, name, force),
        Some(Commands::Status) => commands::status::handle(&context),
        Some(Commands::Config { action }) => commands::config::handle(action),
    }
}
