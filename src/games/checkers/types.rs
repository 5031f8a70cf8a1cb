//! Core domain types for checkers.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// Side of the board a piece belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Color {
    /// Black starts at the bottom rows and moves first.
    Black,
    /// White starts at the top rows.
    White,
}

impl Color {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Row delta of this color's forward direction.
    pub fn forward(self) -> isize {
        match self {
            Color::Black => -1,
            Color::White => 1,
        }
    }

    /// Row on which a man of this color is promoted.
    pub fn promotion_row(self, size: usize) -> usize {
        match self {
            Color::Black => 0,
            Color::White => size - 1,
        }
    }
}

/// Rank of a piece.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum PieceKind {
    /// Moves forward only.
    Man,
    /// Moves in both row directions.
    King,
}

/// A checkers piece.
///
/// Pieces are immutable values. Promotion replaces a man with
/// [`Piece::promoted`] rather than changing it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Man or king.
    pub kind: PieceKind,
    /// Owner of the piece.
    pub color: Color,
}

impl Piece {
    /// Creates a man of the given color.
    pub fn man(color: Color) -> Self {
        Self {
            kind: PieceKind::Man,
            color,
        }
    }

    /// Creates a king of the given color.
    pub fn king(color: Color) -> Self {
        Self {
            kind: PieceKind::King,
            color,
        }
    }

    /// Returns true for kings.
    pub fn is_king(self) -> bool {
        self.kind == PieceKind::King
    }

    /// Returns the king of this piece's color.
    pub fn promoted(self) -> Self {
        Self::king(self.color)
    }

    /// Single-character symbol used by the text rendering.
    pub fn symbol(self) -> char {
        match (self.color, self.kind) {
            (Color::Black, PieceKind::Man) => 'b',
            (Color::Black, PieceKind::King) => 'B',
            (Color::White, PieceKind::Man) => 'w',
            (Color::White, PieceKind::King) => 'W',
        }
    }
}

/// Row directions a piece may move and capture in.
pub fn allowed_directions(piece: Piece) -> &'static [isize] {
    match (piece.kind, piece.color) {
        (PieceKind::King, _) => &[-1, 1],
        (PieceKind::Man, Color::Black) => &[-1],
        (PieceKind::Man, Color::White) => &[1],
    }
}

/// Returns true if a man standing on `position` would be promoted.
///
/// Kings are never eligible.
pub fn is_promotion_eligible(piece: Piece, position: Position, size: usize) -> bool {
    piece.kind == PieceKind::Man && position.row == piece.color.promotion_row(size)
}
