//! Error types for the board engine and the game session.

use super::position::Position;
use super::types::Color;

/// Error raised by board queries and moves.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// A coordinate lies outside the board.
    #[display("Position {} is outside the board", _0)]
    InvalidPosition(#[error(not(source))] Position),

    /// The destination is not among the legal moves of the source piece.
    #[display("Illegal move from {} to {}", from, to)]
    IllegalMove {
        /// Source square.
        from: Position,
        /// Requested destination.
        to: Position,
    },

    /// A board cannot be built with this many squares per side.
    #[display("Unsupported board size {}", _0)]
    InvalidBoardSize(#[error(not(source))] usize),
}

/// Error raised by [`GameSession`](super::GameSession) operations.
///
/// A rejected call never changes the board, the player to move or the
/// lifecycle state.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum SessionError {
    /// Board-level failure, passed through unchanged.
    #[display("{}", _0)]
    #[from]
    Board(BoardError),

    /// The acted-on square does not hold a piece of the player to move.
    #[display("It is {}'s turn, square holds {}", expected, describe(found))]
    TurnViolation {
        /// Color whose turn it is.
        expected: Color,
        /// Color found on the square, if any.
        found: Option<Color>,
    },

    /// The move source is empty.
    #[display("There is no piece at {}", _0)]
    NoPieceAtSource(#[error(not(source))] Position),

    /// The game already reached a terminal state.
    #[display("Game is already over")]
    GameOver,

    /// Rule settings may only change before the first move.
    #[display("Settings can only be changed before the game starts")]
    SettingsLocked,

    /// A persisted snapshot could not be turned into a session.
    #[display("Invalid save format: {}", _0)]
    InvalidSaveFormat(#[error(not(source))] String),

    /// Reading or writing a save file failed.
    #[display("Save file error: {}", _0)]
    Persistence(#[error(not(source))] String),
}

fn describe(found: &Option<Color>) -> String {
    match found {
        Some(color) => color.to_string(),
        None => "no piece".to_string(),
    }
}
