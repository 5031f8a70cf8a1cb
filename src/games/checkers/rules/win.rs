//! Win detection for checkers.

use super::super::board::Board;
use super::super::types::Color;
use strum::IntoEnumIterator;
use tracing::instrument;

/// Returns the color that has no pieces left, if any.
#[instrument(skip(board))]
pub fn eliminated_color(board: &Board) -> Option<Color> {
    Color::iter().find(|color| board.count(*color) == 0)
}

/// Checks if one side has lost every piece.
#[instrument(skip(board))]
pub fn check_for_win(board: &Board) -> bool {
    eliminated_color(board).is_some()
}
