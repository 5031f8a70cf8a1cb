//! Jump-chain search and capture path selection.
//!
//! The search walks every chain of captures a piece can make from a square
//! without touching the board. Captured pieces stay in place while the
//! search runs, and the moving piece still occupies its origin, so the
//! origin is never a legal landing square.

use super::super::board::Board;
use super::super::position::Position;
use super::super::types::{Piece, allowed_directions, is_promotion_eligible};
use std::collections::HashSet;
use tracing::{debug, instrument, trace};

/// Landing squares of one capture chain, in jump order, origin excluded.
pub type JumpPath = Vec<Position>;

/// Finds every capture chain `piece` can make starting at `origin`.
///
/// Each landing produces its own path, so a chain of three jumps yields
/// three paths: its one-, two- and three-jump prefixes. Landing squares are
/// visited at most once per search, which bounds the search even when
/// captures form a loop.
///
/// With multi-jump disabled on the board, only single captures are returned.
#[instrument(skip(board), fields(multi_jump = board.multi_jump()))]
pub fn find_jump_paths(board: &Board, origin: Position, piece: Piece) -> Vec<JumpPath> {
    let mut visited = HashSet::new();
    let paths = search(board, origin, piece, &[], &mut visited);
    debug!(path_count = paths.len(), "Jump search finished");
    paths
}

fn search(
    board: &Board,
    position: Position,
    piece: Piece,
    path: &[Position],
    visited: &mut HashSet<Position>,
) -> Vec<JumpPath> {
    let mut paths = Vec::new();

    // Continuations beyond the first landing need multi-jump
    if !path.is_empty() && !board.multi_jump() {
        return paths;
    }

    if !position.is_within(board.size()) {
        return paths;
    }

    // Reaching the far row mid-chain lets the rest of the chain move like a king
    let piece = if is_promotion_eligible(piece, position, board.size()) {
        piece.promoted()
    } else {
        piece
    };

    for &direction in allowed_directions(piece) {
        for side in [1, -1] {
            let (Some(over), Some(landing)) = (
                position.offset(direction, side),
                position.offset(2 * direction, 2 * side),
            ) else {
                continue;
            };

            if !landing.is_within(board.size()) {
                continue;
            }

            if !board.is_occupied_by(over, piece.color.opponent()) {
                continue;
            }

            if board.cell(landing).is_some() || visited.contains(&landing) {
                continue;
            }

            trace!(%position, %over, %landing, "Capture found");

            let mut next = path.to_vec();
            next.push(landing);
            visited.insert(landing);

            let continuations = search(board, landing, piece, &next, visited);
            paths.push(next);
            paths.extend(continuations);
        }
    }

    paths
}

/// Picks the capture chain a move from `from` to `to` stands for.
///
/// Among all chains found from `from`, paths that repeat a square are
/// dropped, and each remaining path is considered both forward and reversed.
/// The longest orientation that ends on `to` wins; ties keep the first one
/// found. The returned path starts with `from`.
///
/// Returns `None` if no chain ends on `to`.
#[instrument(skip(board))]
pub fn select_capture_path(board: &Board, from: Position, to: Position) -> Option<Vec<Position>> {
    let piece = board.cell(from)?;
    let mut longest: Vec<Position> = Vec::new();

    for jumps in find_jump_paths(board, from, piece) {
        let mut path = Vec::with_capacity(jumps.len() + 1);
        path.push(from);
        path.extend(jumps);

        if has_repeated_square(&path) {
            continue;
        }

        let reversed: Vec<Position> = path.iter().rev().copied().collect();
        for candidate in [path, reversed] {
            if candidate.last() == Some(&to) && candidate.len() > longest.len() {
                longest = candidate;
            }
        }
    }

    if longest.is_empty() {
        None
    } else {
        debug!(length = longest.len() - 1, "Selected capture path");
        Some(longest)
    }
}

/// Squares jumped over along a path, one per consecutive pair.
pub fn captured_squares(path: &[Position]) -> Vec<Position> {
    let mut captured = Vec::new();
    for pair in path.windows(2) {
        let square = pair[0].midpoint(pair[1]);
        if !captured.contains(&square) {
            captured.push(square);
        }
    }
    captured
}

fn has_repeated_square(path: &[Position]) -> bool {
    let mut seen = HashSet::with_capacity(path.len());
    !path.iter().all(|position| seen.insert(*position))
}
