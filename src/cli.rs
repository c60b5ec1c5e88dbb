use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "skelgen",
    version,
    about = "Create a directory and file skeleton from a nested description"
)]
pub struct Cli {
    /// Directory to build the skeleton under (defaults to the current directory).
    #[arg(short = 'C', long = "chdir", global = true)]
    pub chdir: Option<PathBuf>,
    /// TOML or JSON description to use instead of the built-in one.
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    /// Keep creating the remaining entries after a failure and report all of them.
    #[arg(short = 'k', long = "keep-going", global = true)]
    pub keep_going: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the skeleton on disk (the default).
    Create,
    /// Print the description as an indented listing.
    Show,
    /// Write the built-in description to a TOML file for editing.
    Generate {
        #[arg()]
        path: Option<PathBuf>,
        #[arg(long = "force", default_value_t = false)]
        force: bool,
    },
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
