//! Command-line interface for strictly_checkers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Checkers - checkers rules engine with a terminal front end
#[derive(Parser, Debug)]
#[command(name = "strictly_checkers")]
#[command(about = "Play checkers in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "checkers.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game on this terminal
    Play {
        /// Disable capture chains beyond the first jump
        #[arg(long)]
        no_multi_jump: bool,

        /// Resume a saved game
        #[arg(long)]
        load: Option<PathBuf>,
    },

    /// Print the win counters
    Leaderboard,

    /// Print a saved game
    Show {
        /// Save file to render
        file: PathBuf,
    },
}
