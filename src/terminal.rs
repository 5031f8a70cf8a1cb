//! Line-based terminal front end.
//!
//! Reads one command per line, applies it to a [`GameSession`] and prints
//! the board and session events. Input and output are generic so the loop
//! can be driven from tests.

use crate::games::checkers::{GameSession, Position, SessionEvent, SessionState};
use anyhow::Result;
use derive_more::{Display, Error};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

const HELP: &str = "\
Commands:
  moves <row> <col>                 list destinations for a piece
  move <row> <col> <row> <col>      move a piece
  board                             print the board
  save <file>                       save the game as JSON
  load <file>                       load a saved game
  restart                           start a new game
  help                              show this text
  quit                              leave";

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    /// List destinations for the piece on a square.
    Moves(Position),
    /// Move a piece.
    Move(Position, Position),
    /// Print the board.
    Board,
    /// Save the session.
    Save(PathBuf),
    /// Load a session.
    Load(PathBuf),
    /// Start over.
    Restart,
    /// Print the command list.
    Help,
    /// Stop the loop.
    Quit,
}

/// A line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{}", message)]
pub struct CommandError {
    /// What was wrong with the line.
    pub message: String,
}

impl CommandError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parses one input line.
#[instrument]
pub fn parse_command(line: &str) -> Result<PlayCommand, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(CommandError::new("empty command"));
    };
    let rest: Vec<&str> = words.collect();

    match (verb.to_lowercase().as_str(), rest.as_slice()) {
        ("moves" | "m", [row, column]) => Ok(PlayCommand::Moves(parse_position(row, column)?)),
        ("move" | "mv", [from_row, from_column, to_row, to_column]) => Ok(PlayCommand::Move(
            parse_position(from_row, from_column)?,
            parse_position(to_row, to_column)?,
        )),
        ("board" | "b", []) => Ok(PlayCommand::Board),
        ("save", [path]) => Ok(PlayCommand::Save(PathBuf::from(path))),
        ("load", [path]) => Ok(PlayCommand::Load(PathBuf::from(path))),
        ("restart", []) => Ok(PlayCommand::Restart),
        ("help" | "?", []) => Ok(PlayCommand::Help),
        ("quit" | "exit" | "q", []) => Ok(PlayCommand::Quit),
        _ => Err(CommandError::new(format!("unrecognized command: {}", line.trim()))),
    }
}

fn parse_position(row: &str, column: &str) -> Result<Position, CommandError> {
    let parse = |text: &str| {
        text.parse::<usize>()
            .map_err(|_| CommandError::new(format!("not a square index: {}", text)))
    };
    Ok(Position::new(parse(row)?, parse(column)?))
}

/// Runs the command loop until `quit` or end of input.
#[instrument(skip_all)]
pub fn run<R: BufRead, W: Write>(session: &mut GameSession, input: R, mut output: W) -> Result<()> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let subscription = session.subscribe(move |event| {
        if let Ok(mut queue) = sink.lock() {
            queue.push(*event);
        }
    });

    writeln!(output, "{}", session.board().display())?;
    writeln!(output, "{} to move. Type 'help' for commands.", session.current_player())?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };
        debug!(?command, "Command parsed");

        if command == PlayCommand::Quit {
            break;
        }
        execute(session, command, &mut output)?;

        let pending: Vec<SessionEvent> = match events.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for event in pending {
            writeln!(output, "{}", describe_event(&event))?;
        }
    }

    session.unsubscribe(subscription);
    info!(state = %session.state(), "Terminal session ended");
    Ok(())
}

fn execute<W: Write>(session: &mut GameSession, command: PlayCommand, output: &mut W) -> Result<()> {
    match command {
        PlayCommand::Moves(position) => match session.possible_moves(position) {
            Ok(moves) if moves.is_empty() => writeln!(output, "No moves from {}", position)?,
            Ok(moves) => {
                let list: Vec<String> = moves.iter().map(ToString::to_string).collect();
                writeln!(output, "Moves from {}: {}", position, list.join(" "))?;
            }
            Err(e) => writeln!(output, "{}", e)?,
        },
        PlayCommand::Move(from, to) => match session.make_move(from, to) {
            Ok(outcome) => {
                if !outcome.captured.is_empty() {
                    writeln!(output, "Captured {} piece(s)", outcome.captured.len())?;
                }
                if outcome.promoted {
                    writeln!(output, "Promoted to king")?;
                }
                writeln!(output, "{}", session.board().display())?;
            }
            Err(e) => writeln!(output, "{}", e)?,
        },
        PlayCommand::Board => writeln!(output, "{}", session.board().display())?,
        PlayCommand::Save(path) => match session.save_to_path(&path) {
            Ok(()) => writeln!(output, "Saved to {}", path.display())?,
            Err(e) => writeln!(output, "{}", e)?,
        },
        PlayCommand::Load(path) => match session.load_from_path(&path) {
            Ok(()) => writeln!(output, "{}", session.board().display())?,
            Err(e) => {
                warn!(error = %e, "Load failed");
                writeln!(output, "{}", e)?;
            }
        },
        PlayCommand::Restart => {
            session.restart();
            writeln!(output, "{}", session.board().display())?;
        }
        PlayCommand::Help => writeln!(output, "{}", HELP)?,
        PlayCommand::Quit => {}
    }
    Ok(())
}

/// One-line description of an event for the terminal.
pub fn describe_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::MoveMade { from, to } => format!("Moved {} -> {}", from, to),
        SessionEvent::GameOver { winner: Some(color) } => format!("Game over: {} wins", color),
        SessionEvent::GameOver { winner: None } => "Game over: draw".to_string(),
        SessionEvent::PlayerChanged(color) => format!("{} to move", color),
        SessionEvent::Restarted => "New game".to_string(),
        SessionEvent::Started => "Game started".to_string(),
    }
}

/// Short status line for a session.
pub fn status_line(session: &GameSession) -> String {
    match session.state() {
        SessionState::NotStarted | SessionState::Playing => {
            format!("{} to move", session.current_player())
        }
        state => state.to_string(),
    }
}
