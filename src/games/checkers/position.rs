//! Board coordinates for checkers.

use derive_new::new;
use serde::{Deserialize, Serialize};

/// A square on the board, addressed by `(row, column)`.
///
/// Positions are plain values: they carry no board size, so callers and the
/// engine check bounds against the board they are used with. Ordering is
/// row-major, which keeps move sets stable for display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new,
)]
pub struct Position {
    /// Row index, `0` is the top row (White's back rank).
    pub row: usize,
    /// Column index, `0` is the leftmost column.
    pub column: usize,
}

impl Position {
    /// Returns the position shifted by the given row/column deltas.
    ///
    /// Returns `None` when the shift would leave the non-negative quadrant.
    /// The upper bound is the board's concern.
    pub fn offset(self, row_delta: isize, column_delta: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(row_delta)?,
            column: self.column.checked_add_signed(column_delta)?,
        })
    }

    /// Returns true if the position lies on a `size` × `size` board.
    pub fn is_within(self, size: usize) -> bool {
        self.row < size && self.column < size
    }

    /// Returns true for the dark squares pieces are placed on.
    pub fn is_dark(self) -> bool {
        (self.row + self.column) % 2 == 1
    }

    /// Returns true if `other` is one diagonal step away.
    pub fn is_adjacent_diagonal(self, other: Self) -> bool {
        self.row.abs_diff(other.row) == 1 && self.column.abs_diff(other.column) == 1
    }

    /// Returns the square between two positions two diagonal steps apart.
    ///
    /// This is the square a capture from `self` to `other` jumps over.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            row: (self.row + other.row) / 2,
            column: (self.column + other.column) / 2,
        }
    }

    /// Row-major index on a board of the given size.
    pub fn to_index(self, size: usize) -> usize {
        self.row * size + self.column
    }

    /// Inverse of [`Position::to_index`].
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            column: index % size,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}
