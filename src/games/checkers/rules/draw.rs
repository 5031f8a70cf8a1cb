//! Blocked-position detection for checkers.
//!
//! A side to move with pieces on the board but nowhere to go ends the game
//! as a draw in this engine.

use super::super::board::Board;
use super::super::types::Color;
use tracing::instrument;

/// Returns true if any piece of `color` has at least one legal move.
#[instrument(skip(board))]
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board.occupied_by(color).into_iter().any(|position| {
        board
            .possible_moves(position)
            .map(|moves| !moves.is_empty())
            .unwrap_or(false)
    })
}
