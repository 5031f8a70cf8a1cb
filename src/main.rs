//! Strictly Checkers - terminal front end
//!
//! Plays checkers on stdin/stdout and inspects saved games and the
//! leaderboard.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use strictly_checkers::{
    CheckersConfig, Color, FileLeaderboard, GameSession, SessionSnapshot, terminal,
};
use strum::IntoEnumIterator;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();
    let config = CheckersConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Play {
            no_multi_jump,
            load,
        } => run_play(config, no_multi_jump, load.as_deref()),
        Command::Leaderboard => run_leaderboard(&config),
        Command::Show { file } => run_show(&file),
    }
}

/// Play a game on this terminal
#[instrument(skip(config))]
fn run_play(config: CheckersConfig, no_multi_jump: bool, load: Option<&Path>) -> Result<()> {
    let config = if no_multi_jump {
        config.with_multi_jumps(false)
    } else {
        config
    };

    let leaderboard = FileLeaderboard::new(config.leaderboard_path());
    let mut session = GameSession::with_board_size(*config.board_size(), Box::new(leaderboard))?;
    session.set_multi_jumps(*config.multi_jumps())?;

    if let Some(path) = load {
        info!(path = %path.display(), "Resuming saved game");
        session.load_from_path(path)?;
    }

    let stdin = std::io::stdin();
    terminal::run(&mut session, stdin.lock(), std::io::stdout())?;

    println!("{}", terminal::status_line(&session));
    Ok(())
}

/// Print the win counters
#[instrument(skip(config))]
fn run_leaderboard(config: &CheckersConfig) -> Result<()> {
    let leaderboard = FileLeaderboard::new(config.leaderboard_path());
    let counts = leaderboard.load()?;

    for color in Color::iter() {
        println!("{:<6} {}", color, counts.wins(color));
    }
    println!("Games  {}", counts.total());
    Ok(())
}

/// Print a saved game
#[instrument]
fn run_show(file: &Path) -> Result<()> {
    let snapshot = SessionSnapshot::load(file)?;
    let board = snapshot.to_board()?;

    println!("{}", board.display());
    println!(
        "State: {}  To move: {}  Multi-jump: {}",
        snapshot.state(),
        snapshot.current_player(),
        snapshot.multi_jumps()
    );
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            // Quiet by default, the game itself prints to stdout
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
