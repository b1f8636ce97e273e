pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "annix")]
#[command(about = "Dead simple package management for your Nix config", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, help = "Force a rebuild when no command is given")]
    pub force: bool,

    #[arg(long, global = true, env = "ANNIX_FILE", help = "Package file to manage")]
    pub file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Show debug logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide parse warnings")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Update system packages to match the package file")]
    Sync {
        #[arg(short, long, help = "Rebuild even if the file is unchanged")]
        force: bool,
    },

    #[command(about = "Search for packages in nixpkgs")]
    Search {
        #[arg(required = true, help = "Query string")]
        query: Vec<String>,
    },

    #[command(about = "Add packages")]
    Add {
        #[arg(required = true, help = "Packages to add")]
        packages: Vec<String>,
        #[arg(short, long, help = "Skip system rebuild")]
        skip_rebuild: bool,
    },

    #[command(about = "Remove packages")]
    Rm {
        #[arg(required = true, help = "Packages to remove")]
        packages: Vec<String>,
        #[arg(short, long, help = "Delete entry instead of disabling")]
        delete: bool,
        #[arg(short, long, help = "Remove all instances if there are duplicates")]
        all: bool,
        #[arg(short, long, help = "Skip system rebuild")]
        skip_rebuild: bool,
    },

    #[command(about = "List installed packages")]
    Ls {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    #[command(about = "Remove disabled packages from the package file")]
    Clean,

    #[command(about = "Save a copy of the current configuration")]
    Save {
        #[arg(help = "Name for the saved configuration (defaults to a timestamp)")]
        name: Option<String>,
        #[arg(short, long, help = "Overwrite an existing copy without asking")]
        force: bool,
    },

    #[command(about = "Show whether the system matches the package file")]
    Status,

    #[command(about = "Configure annix settings")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set {
        key: String,
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}
