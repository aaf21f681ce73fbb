//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for confshelf.
#[derive(Parser, Debug)]
#[command(
    name = "confshelf",
    about = "Move configuration files into a repository and link them back",
    version
)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create ~/.confshelf and initialise the repository
    Setup,
    /// Move a file into the repository and leave a link in its place
    Manage {
        /// File to manage
        source: PathBuf,
        /// Name of the file inside the repository
        name: String,
    },
    /// Link a new location to a file already in the repository
    Link {
        /// Name of the file inside the repository
        name: String,
        /// Where to create the link
        link: PathBuf,
    },
    /// List managed links and check that they are intact
    List,
    /// Recreate managed links that have gone missing
    Restore,
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the log file (`<name>.log`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Manage { .. } => "manage",
            Self::Link { .. } => "link",
            Self::List => "list",
            Self::Restore => "restore",
            Self::Version => "version",
        }
    }
}
